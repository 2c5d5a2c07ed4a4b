//! Restaurant maintenance.
//!
//! Every write path validates its fields and, when present, the weekly schedule
//! before the repository is touched. Writes are restricted to admins.

use log::info;
use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};
use crate::api::{
    Identity, NewRestaurant, Page, PageRequest, RawWeeklySchedule, Restaurant, RestaurantId,
    RestaurantUpdate, WeeklySchedule,
};
use crate::db::repository::FullRepository;
use crate::models::{MAX_NAME_LEN, MAX_POSTAL_CODE_LEN};

/// Restaurant fields as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantDraft {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    #[serde(alias = "postalcode")]
    pub postal_code: String,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(alias = "availabletime", alias = "availableTime")]
    pub available_time: RawWeeklySchedule,
}

/// Partial restaurant update as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    #[serde(alias = "postalcode")]
    pub postal_code: Option<String>,
    pub tel: Option<String>,
    #[serde(alias = "availabletime", alias = "availableTime")]
    pub available_time: Option<RawWeeklySchedule>,
}

fn require_admin(identity: &Identity, action: &str) -> ServiceResult<()> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "User role {} is not authorized to {} restaurants",
            identity.role, action
        )))
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidRestaurant(
            "Please add a name".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::InvalidRestaurant(format!(
            "Name can not be more than {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_required(field: &str, value: &str) -> ServiceResult<String> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidRestaurant(format!(
            "Please add a {}",
            field
        )));
    }
    Ok(value.to_string())
}

fn validate_postal_code(value: &str) -> ServiceResult<String> {
    let value = validate_required("postal code", value)?;
    if value.chars().count() > MAX_POSTAL_CODE_LEN {
        return Err(ServiceError::InvalidRestaurant(format!(
            "Postal Code can not be more than {} digits",
            MAX_POSTAL_CODE_LEN
        )));
    }
    Ok(value)
}

impl RestaurantDraft {
    /// Check every field and the schedule.
    pub fn validate(&self) -> ServiceResult<NewRestaurant> {
        Ok(NewRestaurant {
            name: validate_name(&self.name)?,
            address: validate_required("address", &self.address)?,
            district: validate_required("district", &self.district)?,
            province: validate_required("province", &self.province)?,
            postal_code: validate_postal_code(&self.postal_code)?,
            tel: self.tel.clone(),
            available_time: WeeklySchedule::parse(&self.available_time)?,
        })
    }
}

impl RestaurantPatch {
    /// Check the supplied fields exactly as [`RestaurantDraft::validate`] would.
    pub fn validate(&self) -> ServiceResult<RestaurantUpdate> {
        Ok(RestaurantUpdate {
            name: self.name.as_deref().map(validate_name).transpose()?,
            address: self
                .address
                .as_deref()
                .map(|v| validate_required("address", v))
                .transpose()?,
            district: self
                .district
                .as_deref()
                .map(|v| validate_required("district", v))
                .transpose()?,
            province: self
                .province
                .as_deref()
                .map(|v| validate_required("province", v))
                .transpose()?,
            postal_code: self
                .postal_code
                .as_deref()
                .map(validate_postal_code)
                .transpose()?,
            tel: self.tel.clone(),
            available_time: self
                .available_time
                .as_ref()
                .map(WeeklySchedule::parse)
                .transpose()?,
        })
    }
}

/// Create a restaurant. Admin only; names are unique.
pub async fn create_restaurant<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    draft: &RestaurantDraft,
) -> ServiceResult<Restaurant> {
    require_admin(identity, "create")?;
    let restaurant = draft.validate()?;
    let stored = repo.create_restaurant(&restaurant).await?;
    info!("Restaurant {} '{}' created", stored.id, stored.name);
    Ok(stored)
}

pub async fn get_restaurant<R: FullRepository + ?Sized>(
    repo: &R,
    id: RestaurantId,
) -> ServiceResult<Restaurant> {
    repo.find_restaurant(id)
        .await?
        .ok_or(ServiceError::RestaurantNotFound(id))
}

/// One page of restaurants, newest first.
pub async fn list_restaurants<R: FullRepository + ?Sized>(
    repo: &R,
    page: PageRequest,
) -> ServiceResult<Page<Restaurant>> {
    Ok(repo.list_restaurants(page).await?)
}

/// Apply a partial update. Admin only.
pub async fn update_restaurant<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    id: RestaurantId,
    patch: &RestaurantPatch,
) -> ServiceResult<Restaurant> {
    require_admin(identity, "update")?;
    let update = patch.validate()?;
    let updated = repo
        .update_restaurant(id, &update)
        .await?
        .ok_or(ServiceError::RestaurantNotFound(id))?;
    info!("Restaurant {} updated", id);
    Ok(updated)
}

/// Delete a restaurant and its reservations. Admin only.
pub async fn delete_restaurant<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    id: RestaurantId,
) -> ServiceResult<()> {
    require_admin(identity, "delete")?;
    if !repo.delete_restaurant(id).await? {
        return Err(ServiceError::RestaurantNotFound(id));
    }
    info!("Restaurant {} deleted with its reservations", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{ScheduleError, Weekday};

    fn week() -> RawWeeklySchedule {
        Weekday::ALL
            .into_iter()
            .map(|day| {
                let hours = if day == Weekday::Sunday {
                    vec![]
                } else {
                    vec!["10:00:00".to_string(), "22:00:00".to_string()]
                };
                (day.name().to_string(), hours)
            })
            .collect()
    }

    fn draft(name: &str) -> RestaurantDraft {
        RestaurantDraft {
            name: name.to_string(),
            address: "99 Rama IV".to_string(),
            district: "Sathorn".to_string(),
            province: "Bangkok".to_string(),
            postal_code: "10120".to_string(),
            tel: None,
            available_time: week(),
        }
    }

    #[test]
    fn test_name_is_trimmed_and_bounded() {
        assert_eq!(draft("  Som Tam  ").validate().unwrap().name, "Som Tam");
        assert!(draft("   ").validate().is_err());
        assert!(draft(&"x".repeat(MAX_NAME_LEN)).validate().is_ok());
        assert!(draft(&"x".repeat(MAX_NAME_LEN + 1)).validate().is_err());
    }

    #[test]
    fn test_postal_code_length() {
        let mut d = draft("A");
        d.postal_code = "123456".to_string();
        assert!(matches!(d.validate(), Err(ServiceError::InvalidRestaurant(_))));
    }

    #[test]
    fn test_schedule_error_names_day() {
        let mut d = draft("A");
        d.available_time.remove("wednesday");
        match d.validate() {
            Err(ServiceError::InvalidSchedule(err)) => assert_eq!(err.day(), Weekday::Wednesday),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_patch_validates_only_supplied_fields() {
        let patch = RestaurantPatch {
            tel: Some("02-111-2222".to_string()),
            ..Default::default()
        };
        let update = patch.validate().unwrap();
        assert_eq!(update.tel.as_deref(), Some("02-111-2222"));
        assert!(update.name.is_none());

        let mut schedule = week();
        schedule.insert("friday".to_string(), vec!["23:00:00".to_string(), "01:00:00".to_string()]);
        let patch = RestaurantPatch {
            available_time: Some(schedule),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(ServiceError::InvalidSchedule(ScheduleError::InvalidDay { day: Weekday::Friday, .. }))
        ));
    }

    #[test]
    fn test_draft_accepts_legacy_field_names() {
        let json = serde_json::json!({
            "name": "Khao",
            "address": "1 Sukhumvit",
            "district": "Watthana",
            "province": "Bangkok",
            "postalcode": "10110",
            "tel": "02-381-2222",
            "availabletime": week(),
        });
        let d: RestaurantDraft = serde_json::from_value(json).unwrap();
        assert_eq!(d.postal_code, "10110");
        assert!(d.validate().is_ok());
    }

    #[tokio::test]
    async fn test_writes_require_admin() {
        let repo = LocalRepository::new();
        let err = create_restaurant(&repo, &Identity::user(1), &draft("A"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(repo.restaurant_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let repo = LocalRepository::new();
        let admin = Identity::admin(1);
        create_restaurant(&repo, &admin, &draft("A")).await.unwrap();
        let err = create_restaurant(&repo, &admin, &draft(" A "))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_restaurant() {
        let repo = LocalRepository::new();
        let admin = Identity::admin(1);
        let missing = RestaurantId::new(5);

        let err = update_restaurant(&repo, &admin, missing, &RestaurantPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RestaurantNotFound(_)));

        let err = delete_restaurant(&repo, &admin, missing).await.unwrap_err();
        assert!(matches!(err, ServiceError::RestaurantNotFound(_)));
    }
}
