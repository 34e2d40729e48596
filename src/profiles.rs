//! Routing profiles: predefined riding styles plus user defined custom
//! profiles persisted to durable storage
use crate::services::routing::{
    AvoidancePreference, BikeType, ClimbPreference, RouteSettings, SurfacePreference,
    TrafficPreference,
};
use crate::storage::{KeyValueStore, ROUTING_PROFILES_KEY};
use crate::Error;
use log::error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named routing preference set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(flatten)]
    pub settings: RouteSettings,
}

/// The built-in riding styles shipped with the planner. Not persisted and
/// not deletable.
pub fn predefined_profiles() -> Vec<RoutingProfile> {
    vec![
        RoutingProfile {
            id: "gravel-adventure".to_string(),
            name: "Gravel Adventure".to_string(),
            description: Some(
                "For the adventurous gravel cyclist who loves unpaved roads.".to_string(),
            ),
            is_default: true,
            is_custom: false,
            settings: RouteSettings {
                bike_type: BikeType::GravelBike,
                average_speed: 20.0,
                surface: SurfacePreference::AvoidBadSmoothnessOnly,
                traffic: TrafficPreference::AvoidIfPossible,
                climbs: ClimbPreference::AvoidIfReasonable,
                ..Default::default()
            },
        },
        RoutingProfile {
            id: "relaxed-road-trip".to_string(),
            name: "Relaxed Road Trip".to_string(),
            description: Some(
                "A comfortable ride on smooth surfaces, avoiding traffic and steep climbs."
                    .to_string(),
            ),
            is_default: false,
            is_custom: false,
            settings: RouteSettings {
                bike_type: BikeType::HybridBike,
                average_speed: 18.0,
                stairs: AvoidancePreference::StrictlyAvoid,
                surface: SurfacePreference::AvoidNonSmooth,
                traffic: TrafficPreference::AvoidIfPossible,
                climbs: ClimbPreference::AvoidIfPossible,
                ..Default::default()
            },
        },
        RoutingProfile {
            id: "urban-commuter".to_string(),
            name: "Urban Commuter".to_string(),
            description: Some("A fast and efficient ride for city commuting.".to_string()),
            is_default: false,
            is_custom: false,
            settings: RouteSettings {
                bike_type: BikeType::CityBike,
                average_speed: 15.0,
                surface: SurfacePreference::AvoidNonSmooth,
                traffic: TrafficPreference::AvoidIfReasonable,
                climbs: ClimbPreference::Ignore,
                ..Default::default()
            },
        },
    ]
}

/// CRUD over custom profiles layered on the key-value store
pub struct ProfileManager {
    store: Box<dyn KeyValueStore>,
}

impl ProfileManager {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        ProfileManager { store }
    }

    /// Predefined profiles followed by the stored custom ones. Corrupt
    /// storage is logged and treated as no custom profiles.
    pub fn profiles(&self) -> Vec<RoutingProfile> {
        let mut profiles = predefined_profiles();
        match self.custom_profiles() {
            Ok(custom) => profiles.extend(custom),
            Err(e) => error!("failed to load custom profiles: {}", e),
        }
        profiles
    }

    pub fn custom_profiles(&self) -> Result<Vec<RoutingProfile>, Error> {
        match self.store.get(ROUTING_PROFILES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_custom_profiles(&mut self, profiles: &[RoutingProfile]) -> Result<(), Error> {
        let raw = serde_json::to_string(profiles)?;
        self.store.set(ROUTING_PROFILES_KEY, &raw)
    }

    /// Store a new custom profile under a generated id
    pub fn add_profile(
        &mut self,
        name: &str,
        description: Option<String>,
        settings: RouteSettings,
    ) -> Result<RoutingProfile, Error> {
        let profile = RoutingProfile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description,
            is_default: false,
            is_custom: true,
            settings,
        };
        let mut custom = self.custom_profiles()?;
        custom.push(profile.clone());
        self.save_custom_profiles(&custom)?;
        Ok(profile)
    }

    /// Replace a stored custom profile by id. Returns whether a profile was
    /// updated; predefined profiles are never touched.
    pub fn update_profile(&mut self, updated: &RoutingProfile) -> Result<bool, Error> {
        let mut custom = self.custom_profiles()?;
        match custom.iter_mut().find(|p| p.id == updated.id) {
            Some(existing) => {
                *existing = updated.clone();
                self.save_custom_profiles(&custom)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a stored custom profile by id
    pub fn delete_profile(&mut self, id: &str) -> Result<bool, Error> {
        let mut custom = self.custom_profiles()?;
        let before = custom.len();
        custom.retain(|p| p.id != id);
        if custom.len() == before {
            return Ok(false);
        }
        self.save_custom_profiles(&custom)?;
        Ok(true)
    }

    /// Look a profile up by name or id across predefined and custom sets
    pub fn find_profile(&self, name_or_id: &str) -> Option<RoutingProfile> {
        self.profiles()
            .into_iter()
            .find(|p| p.name == name_or_id || p.id == name_or_id)
    }

    /// The profile used when none is requested explicitly
    pub fn default_profile(&self) -> RoutingProfile {
        let mut profiles = self.profiles();
        let position = profiles.iter().position(|p| p.is_default).unwrap_or(0);
        profiles.swap_remove(position)
    }
}
