use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interpreter::CommandIntent;

/// Portal destinations reachable by voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Login { role: String },
}

impl Route {
    pub fn from_intent(intent: &CommandIntent) -> Option<Self> {
        match intent {
            CommandIntent::NavigateHome => Some(Route::Home),
            CommandIntent::NavigateLogin { role } => Some(Route::Login { role: role.clone() }),
            CommandIntent::RequestHelp | CommandIntent::Unrecognized => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login { role } => format!("/login/{}", role),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Router owned by the UI; the voice layer only asks it to move
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Login { role: "health-worker".to_string() }.path(), "/login/health-worker");
    }

    #[test]
    fn test_only_navigation_intents_map_to_routes() {
        assert_eq!(Route::from_intent(&CommandIntent::NavigateHome), Some(Route::Home));
        assert_eq!(Route::from_intent(&CommandIntent::RequestHelp), None);
        assert_eq!(Route::from_intent(&CommandIntent::Unrecognized), None);
    }
}
