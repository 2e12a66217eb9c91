use super::{NavigationError, Route, RouteChange};

/// Ordered path of routes pushed above the feature's root screen.
///
/// An empty stack means the root screen is showing. Two adjacent entries
/// are never equal unless the stack was built with
/// [`RouteStack::allowing_duplicates`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStack<R> {
    entries: Vec<R>,
    allow_adjacent_duplicates: bool,
}

impl<R: Route> RouteStack<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            allow_adjacent_duplicates: false,
        }
    }

    pub fn allowing_duplicates(mut self, allow: bool) -> Self {
        self.allow_adjacent_duplicates = allow;
        self
    }

    /// Build a stack from routes resolved ahead of time (e.g. deep links).
    ///
    /// # Errors
    /// Fails on adjacent duplicates unless they are permitted.
    pub fn seeded(
        routes: impl IntoIterator<Item = R>,
        allow_adjacent_duplicates: bool,
    ) -> Result<Self, NavigationError> {
        let mut stack = Self::new().allowing_duplicates(allow_adjacent_duplicates);
        for route in routes {
            stack.push(route)?;
        }
        Ok(stack)
    }

    pub fn entries(&self) -> &[R] {
        &self.entries
    }

    pub fn top(&self) -> Option<&R> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, route: R) -> Result<(), NavigationError> {
        self.check_adjacent(self.entries.last(), &route)?;
        self.entries.push(route);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<R, NavigationError> {
        self.entries.pop().ok_or(NavigationError::EmptyStack)
    }

    /// Remove every pushed route, returning them bottom-first.
    pub fn pop_to_root(&mut self) -> Vec<R> {
        std::mem::take(&mut self.entries)
    }

    /// Swap the top route. On an empty stack this behaves like `push`.
    pub fn replace(&mut self, route: R) -> Result<Option<R>, NavigationError> {
        let below = self
            .entries
            .len()
            .checked_sub(2)
            .and_then(|index| self.entries.get(index));
        self.check_adjacent(below, &route)?;

        let replaced = self.entries.pop();
        self.entries.push(route);
        Ok(replaced)
    }

    pub fn apply(&mut self, change: &RouteChange<R>) -> Result<(), NavigationError> {
        match change {
            RouteChange::Push(route) => self.push(route.clone()),
            RouteChange::Pop => self.pop().map(|_| ()),
            RouteChange::PopToRoot => {
                self.pop_to_root();
                Ok(())
            }
            RouteChange::Replace(route) => self.replace(route.clone()).map(|_| ()),
        }
    }

    fn check_adjacent(&self, neighbour: Option<&R>, route: &R) -> Result<(), NavigationError> {
        if self.allow_adjacent_duplicates {
            return Ok(());
        }
        match neighbour {
            Some(existing) if existing == route => Err(NavigationError::DuplicateRoute {
                route: format!("{:?}", route),
            }),
            _ => Ok(()),
        }
    }
}

impl<R: Route> Default for RouteStack<R> {
    fn default() -> Self {
        Self::new()
    }
}
