//! Reservation workflows.
//!
//! Creation runs a fixed sequence of awaited repository calls:
//!
//! 1. Look up the restaurant (`RestaurantNotFound` stops here)
//! 2. Count the caller's existing reservations
//! 3. Apply the quota (`QuotaExceeded`)
//! 4. Check the restaurant's window for the requested instant (`OutsideAvailability`)
//! 5. Insert
//!
//! Nothing holds a lock between steps 2 and 5, so two concurrent requests from the
//! same user can both pass the quota.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::BTreeMap;

use super::availability::is_reservation_time_allowed;
use super::error::{ServiceError, ServiceResult};
use super::quota::{is_under_quota, RESERVATION_QUOTA};
use crate::api::{
    Identity, NewReservation, Reservation, ReservationDetails, ReservationFilter, ReservationId,
    ReservationRequest, RestaurantId, RestaurantSummary, Weekday,
};
use crate::db::repository::FullRepository;

/// Admit and store a new reservation.
pub async fn create_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    request: &ReservationRequest,
) -> ServiceResult<Reservation> {
    let restaurant = repo
        .find_restaurant(request.restaurant_id)
        .await?
        .ok_or(ServiceError::RestaurantNotFound(request.restaurant_id))?;

    let user_id = request.identity.user_id;
    let existing = repo.count_reservations_by_user(user_id).await?;
    if !is_under_quota(existing, request.identity.is_admin()) {
        info!(
            "Reservation refused: user {} already holds {} reservations",
            user_id, existing
        );
        return Err(ServiceError::QuotaExceeded {
            user_id,
            limit: RESERVATION_QUOTA,
        });
    }

    if !is_reservation_time_allowed(&restaurant.available_time, request.reserved_date) {
        info!(
            "Reservation refused: restaurant {} closed at {}",
            restaurant.id, request.reserved_date
        );
        return Err(ServiceError::OutsideAvailability {
            restaurant_id: restaurant.id,
            reserved_date: request.reserved_date,
            weekday: Weekday::of(&request.reserved_date),
        });
    }

    let stored = repo
        .insert_reservation(&NewReservation {
            user_id,
            restaurant_id: restaurant.id,
            reserved_date: request.reserved_date,
        })
        .await?;
    info!(
        "Reservation {} created for user {} at restaurant {}",
        stored.id, user_id, restaurant.id
    );
    Ok(stored)
}

/// Reservations visible to `identity`, each with a summary of its restaurant.
///
/// Non-admins only ever see their own reservations and `restaurant_id` is ignored
/// for them. Admins see everything, or one restaurant's reservations.
pub async fn list_reservations<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    restaurant_id: Option<RestaurantId>,
) -> ServiceResult<Vec<ReservationDetails>> {
    let filter = match (identity.is_admin(), restaurant_id) {
        (false, _) => ReservationFilter::by_user(identity.user_id),
        (true, Some(restaurant_id)) => ReservationFilter::by_restaurant(restaurant_id),
        (true, None) => ReservationFilter::default(),
    };

    let reservations = repo.list_reservations(filter).await?;
    debug!("Listing {} reservations for {:?}", reservations.len(), filter);
    with_summaries(repo, reservations).await
}

/// A single reservation, visible to its owner and to admins.
pub async fn get_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    id: ReservationId,
) -> ServiceResult<ReservationDetails> {
    let reservation = find_authorized(repo, identity, id, "view").await?;
    let mut details = with_summaries(repo, vec![reservation]).await?;
    details
        .pop()
        .ok_or(ServiceError::ReservationNotFound(id))
}

/// Move a reservation to a new instant.
///
/// The new instant is not checked against the restaurant's schedule.
pub async fn update_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    id: ReservationId,
    reserved_date: DateTime<Utc>,
) -> ServiceResult<Reservation> {
    find_authorized(repo, identity, id, "update").await?;
    let updated = repo
        .update_reservation_date(id, reserved_date)
        .await?
        .ok_or(ServiceError::ReservationNotFound(id))?;
    info!("Reservation {} moved to {}", id, reserved_date);
    Ok(updated)
}

/// Delete a reservation owned by `identity` (or any, for admins).
pub async fn delete_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    id: ReservationId,
) -> ServiceResult<()> {
    find_authorized(repo, identity, id, "delete").await?;
    if !repo.delete_reservation(id).await? {
        return Err(ServiceError::ReservationNotFound(id));
    }
    info!("Reservation {} deleted by user {}", id, identity.user_id);
    Ok(())
}

async fn find_authorized<R: FullRepository + ?Sized>(
    repo: &R,
    identity: &Identity,
    id: ReservationId,
    action: &str,
) -> ServiceResult<Reservation> {
    let reservation = repo
        .find_reservation(id)
        .await?
        .ok_or(ServiceError::ReservationNotFound(id))?;

    if !identity.may_act_for(reservation.user_id) {
        return Err(ServiceError::Forbidden(format!(
            "User {} is not authorized to {} this reservation",
            identity.user_id, action
        )));
    }
    Ok(reservation)
}

async fn with_summaries<R: FullRepository + ?Sized>(
    repo: &R,
    reservations: Vec<Reservation>,
) -> ServiceResult<Vec<ReservationDetails>> {
    let mut summaries: BTreeMap<RestaurantId, Option<RestaurantSummary>> = BTreeMap::new();
    for reservation in &reservations {
        if !summaries.contains_key(&reservation.restaurant_id) {
            let summary = repo
                .find_restaurant(reservation.restaurant_id)
                .await?
                .as_ref()
                .map(RestaurantSummary::from);
            summaries.insert(reservation.restaurant_id, summary);
        }
    }

    Ok(reservations
        .into_iter()
        .map(|reservation| ReservationDetails {
            restaurant: summaries
                .get(&reservation.restaurant_id)
                .cloned()
                .flatten(),
            reservation,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Interval, NewRestaurant, TimeOfDay, UserId, WeeklySchedule};
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::{ReservationRepository, RestaurantRepository};
    use chrono::TimeZone;

    fn open_every_day() -> WeeklySchedule {
        let all_day = Interval::open(
            TimeOfDay::parse("00:00:00").unwrap(),
            TimeOfDay::parse("23:59:59").unwrap(),
        );
        Weekday::ALL
            .into_iter()
            .fold(WeeklySchedule::closed(), |s, day| {
                s.with_day(day, all_day.clone())
            })
    }

    async fn seeded() -> (LocalRepository, RestaurantId) {
        let repo = LocalRepository::new();
        let restaurant = repo
            .create_restaurant(&NewRestaurant {
                name: "Baan Suan".to_string(),
                address: "12 Soi 5".to_string(),
                district: "Pathum Wan".to_string(),
                province: "Bangkok".to_string(),
                postal_code: "10330".to_string(),
                tel: Some("02-000-0000".to_string()),
                available_time: open_every_day(),
            })
            .await
            .unwrap();
        (repo, restaurant.id)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap()
    }

    fn request(identity: Identity, restaurant_id: RestaurantId) -> ReservationRequest {
        ReservationRequest {
            identity,
            restaurant_id,
            reserved_date: noon(),
        }
    }

    #[tokio::test]
    async fn test_admin_bypasses_quota() {
        let (repo, id) = seeded().await;
        for _ in 0..5 {
            create_reservation(&repo, &request(Identity::admin(1), id))
                .await
                .unwrap();
        }
        assert_eq!(repo.reservation_count(), 5);
    }

    #[tokio::test]
    async fn test_list_scopes_by_role() {
        let (repo, id) = seeded().await;
        create_reservation(&repo, &request(Identity::user(1), id)).await.unwrap();
        create_reservation(&repo, &request(Identity::user(2), id)).await.unwrap();

        let own = list_reservations(&repo, &Identity::user(1), Some(id)).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].reservation.user_id, UserId::new(1));
        assert_eq!(own[0].restaurant.as_ref().unwrap().name, "Baan Suan");

        let all = list_reservations(&repo, &Identity::admin(9), None).await.unwrap();
        assert_eq!(all.len(), 2);

        let elsewhere =
            list_reservations(&repo, &Identity::admin(9), Some(RestaurantId::new(99)))
                .await
                .unwrap();
        assert!(elsewhere.is_empty());
    }

    #[tokio::test]
    async fn test_other_users_reservation_is_forbidden() {
        let (repo, id) = seeded().await;
        let booked = create_reservation(&repo, &request(Identity::user(1), id))
            .await
            .unwrap();

        let err = get_reservation(&repo, &Identity::user(2), booked.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = delete_reservation(&repo, &Identity::user(2), booked.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(repo.reservation_count(), 1);

        assert!(get_reservation(&repo, &Identity::admin(3), booked.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_skips_availability() {
        let (repo, id) = seeded().await;
        let booked = create_reservation(&repo, &request(Identity::user(1), id))
            .await
            .unwrap();

        repo.update_restaurant(
            id,
            &crate::api::RestaurantUpdate {
                available_time: Some(WeeklySchedule::closed()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let later = noon() + chrono::Duration::hours(1);
        let moved = update_reservation(&repo, &Identity::user(1), booked.id, later)
            .await
            .unwrap();
        assert_eq!(moved.reserved_date, later);
    }

    #[tokio::test]
    async fn test_missing_reservation_is_not_found() {
        let (repo, _) = seeded().await;
        let missing = ReservationId::new(42);
        let err = delete_reservation(&repo, &Identity::admin(1), missing)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ReservationNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_summary_absent_once_restaurant_gone() {
        let (repo, id) = seeded().await;
        let booked = create_reservation(&repo, &request(Identity::user(1), id))
            .await
            .unwrap();

        // Simulates a dangling reference left by an external delete.
        let other = repo.find_reservation(booked.id).await.unwrap().unwrap();
        let details = with_summaries(
            &repo,
            vec![Reservation {
                restaurant_id: RestaurantId::new(77),
                ..other
            }],
        )
        .await
        .unwrap();
        assert!(details[0].restaurant.is_none());
    }
}
