//! Restaurant records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::WeeklySchedule;
use crate::api::RestaurantId;

/// Maximum length of a restaurant name after trimming.
pub const MAX_NAME_LEN: usize = 50;
/// Maximum length of a postal code.
pub const MAX_POSTAL_CODE_LEN: usize = 5;

/// A stored restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    pub available_time: WeeklySchedule,
    pub created_at: DateTime<Utc>,
}

/// A restaurant that has passed field and schedule validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
    pub tel: Option<String>,
    pub available_time: WeeklySchedule,
}

impl NewRestaurant {
    pub fn into_restaurant(self, id: RestaurantId, created_at: DateTime<Utc>) -> Restaurant {
        Restaurant {
            id,
            name: self.name,
            address: self.address,
            district: self.district,
            province: self.province,
            postal_code: self.postal_code,
            tel: self.tel,
            available_time: self.available_time,
            created_at,
        }
    }
}

/// Validated partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub tel: Option<String>,
    pub available_time: Option<WeeklySchedule>,
}

impl RestaurantUpdate {
    pub fn is_empty(&self) -> bool {
        self == &RestaurantUpdate::default()
    }

    pub fn apply_to(&self, restaurant: &mut Restaurant) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut restaurant.name, &self.name);
        set(&mut restaurant.address, &self.address);
        set(&mut restaurant.district, &self.district);
        set(&mut restaurant.province, &self.province);
        set(&mut restaurant.postal_code, &self.postal_code);
        set(&mut restaurant.available_time, &self.available_time);
        if self.tel.is_some() {
            restaurant.tel = self.tel.clone();
        }
    }
}

/// The restaurant fields embedded in reservation listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
}

impl From<&Restaurant> for RestaurantSummary {
    fn from(r: &Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            address: r.address.clone(),
            tel: r.tel.clone(),
        }
    }
}
