//! Route stack: which screen is visible and what it points at.
//!
//! The only parameter a route carries is the city id string; everything
//! else a screen needs comes from the store.

/// A navigable screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    CityDetail { city_id: String },
    Favorites,
    Settings,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Search => "Search",
            Route::CityDetail { .. } => "City",
            Route::Favorites => "Favorites",
            Route::Settings => "Settings",
        }
    }

    /// The next top-level tab in the cycle Search → Favorites → Settings.
    pub fn next_tab(&self) -> Route {
        match self {
            Route::Search | Route::CityDetail { .. } => Route::Favorites,
            Route::Favorites => Route::Settings,
            Route::Settings => Route::Search,
        }
    }
}

/// Stack of routes; never empty, the bottom entry is the active tab.
#[derive(Debug)]
pub struct RouteStack {
    stack: Vec<Route>,
}

impl Default for RouteStack {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Search],
        }
    }

    pub fn current(&self) -> &Route {
        self.stack.last().expect("route stack is never empty")
    }

    /// The tab at the bottom of the stack.
    pub fn root(&self) -> &Route {
        self.stack.first().expect("route stack is never empty")
    }

    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pop the current route. Returns false (and does nothing) at the root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replace the whole stack with a single top-level tab.
    pub fn switch_root(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }
}
