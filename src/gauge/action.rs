use super::host::{Command, EntityId, HostEvent, NavigationPath};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// What a tap on the center of the gauge does.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "action")]
#[strum(serialize_all = "kebab-case")]
pub enum TapAction {
    #[default]
    #[serde(rename = "toggle")]
    Toggle,
    #[serde(rename = "turn_on", alias = "turn-on")]
    TurnOn,
    #[serde(rename = "turn_off", alias = "turn-off")]
    TurnOff,
    #[serde(rename = "more-info", alias = "show-detail")]
    MoreInfo,
    #[serde(rename = "navigate")]
    Navigate {
        #[serde(default)]
        navigation_path: Option<NavigationPath>,
    },
    #[serde(rename = "call-service", alias = "custom")]
    CallService {
        #[serde(default)]
        service: Option<String>,
        #[serde(default)]
        service_data: Option<serde_json::Value>,
    },
    #[serde(rename = "none")]
    NoAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    Command(Command),
    Event(HostEvent),
}

impl TapAction {
    /// Turns the action into something to send or emit. Incomplete descriptors
    /// (no path, no `domain.service`) resolve to nothing.
    pub fn resolve(&self, entity: &EntityId) -> Option<TapOutcome> {
        let target = entity.clone();
        let outcome = match self {
            Self::Toggle => TapOutcome::Command(Command::Toggle { target }),
            Self::TurnOn => TapOutcome::Command(Command::TurnOn { target }),
            Self::TurnOff => TapOutcome::Command(Command::TurnOff { target }),
            Self::MoreInfo => TapOutcome::Event(HostEvent::ShowDetail { entity: target }),
            Self::Navigate { navigation_path } => {
                let path = navigation_path.clone().filter(|p| !p.is_empty())?;
                TapOutcome::Event(HostEvent::Navigate { path })
            }
            Self::CallService {
                service,
                service_data,
            } => {
                let (domain, service) = service.as_deref().and_then(split_service)?;
                TapOutcome::Command(Command::Custom {
                    domain: domain.to_string(),
                    service: service.to_string(),
                    payload: service_data
                        .clone()
                        .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
                })
            }
            Self::NoAction => return None,
        };
        Some(outcome)
    }
}

fn split_service(s: &str) -> Option<(&str, &str)> {
    s.split_once('.')
        .filter(|(domain, service)| !domain.is_empty() && !service.is_empty())
}
