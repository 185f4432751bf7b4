//! URL fragment router.
//!
//! `#planner/<payload>` opens a shared plan, the three tab fragments select a
//! view, and anything else falls back to the baseline view.

/// Non-planner views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Population,
    Upkeep,
    Balancing,
}

impl Tab {
    pub fn name(self) -> &'static str {
        match self {
            Tab::Population => "population",
            Tab::Upkeep => "upkeep",
            Tab::Balancing => "balancing",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "population" => Some(Tab::Population),
            "upkeep" => Some(Tab::Upkeep),
            "balancing" => Some(Tab::Balancing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Planner with an encoded plan (possibly empty).
    Planner(String),
    Tab(Tab),
    Baseline,
}

impl Route {
    /// Parse a fragment, with or without the leading `#`. A full URL is cut
    /// at its first `#`.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim();
        let fragment = match fragment.find('#') {
            Some(idx) => &fragment[idx + 1..],
            None => fragment,
        };
        if let Some(payload) = fragment.strip_prefix("planner/") {
            return Route::Planner(payload.to_string());
        }
        match Tab::from_name(fragment) {
            Some(tab) => Route::Tab(tab),
            None => Route::Baseline,
        }
    }

    /// Fragment for this route, including the `#`. Baseline has none.
    pub fn to_fragment(&self) -> String {
        match self {
            Route::Planner(payload) => format!("#planner/{}", payload),
            Route::Tab(tab) => format!("#{}", tab.name()),
            Route::Baseline => String::new(),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Route::Planner(payload) => Some(payload),
            _ => None,
        }
    }
}
