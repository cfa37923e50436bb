//! Maintenance request lifecycle service
//!
//! Owns the ticket workflow: creation (always NEW), status changes with the
//! SCRAP → UNUSABLE equipment cascade, and assignment (always IN_PROGRESS).
//! Each mutation runs in a single store transaction.

use validator::Validate;

use super::lifecycle::TransitionPolicy;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, Priority, RequestStatus, RequestType},
        parse_optional_datetime, required_text,
        request::{
            CreateRequest, MaintenanceRequest, NewRequest, RequestChange, RequestDetails,
            RequestQuery,
        },
    },
    repository::{MaintenanceStore, Repository, StoreTransaction},
};

fn request_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Maintenance request {} not found", id))
}

fn equipment_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Equipment {} not found", id))
}

#[derive(Clone)]
pub struct RequestsService<S: MaintenanceStore = Repository> {
    store: S,
    policy: TransitionPolicy,
}

impl<S: MaintenanceStore> RequestsService<S> {
    pub fn new(store: S, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// List requests with equipment and assignee (kanban and calendar views)
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        self.store.requests_list(query).await
    }

    pub async fn get(&self, id: i32) -> AppResult<RequestDetails> {
        self.store
            .requests_get(id)
            .await?
            .ok_or_else(|| request_not_found(id))
    }

    /// Maintenance history of one equipment, newest first
    pub async fn history(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceRequest>> {
        if self.store.equipment_get(equipment_id).await?.is_none() {
            return Err(equipment_not_found(equipment_id));
        }
        self.store.requests_for_equipment(equipment_id).await
    }

    /// Report a breakdown or schedule a preventive task.
    ///
    /// Any status supplied by the caller is ignored; requests always start as NEW.
    pub async fn create(&self, data: &CreateRequest) -> AppResult<MaintenanceRequest> {
        data.validate()?;

        let request_type: RequestType = data.request_type.parse().map_err(AppError::Validation)?;
        let priority: Priority = data.priority.parse().map_err(AppError::Validation)?;
        let scheduled_date =
            parse_optional_datetime("scheduledDate", data.scheduled_date.as_deref())?;

        if let Some(ref status) = data.status {
            tracing::debug!("Ignoring caller-supplied status {} on new request", status);
        }

        let new_request = NewRequest {
            title: required_text("title", &data.title)?,
            description: data.description.clone(),
            request_type,
            priority,
            equipment_id: data.equipment_id,
            scheduled_date,
        };

        let mut tx = self.store.begin().await?;
        if tx.equipment_get(data.equipment_id).await?.is_none() {
            return Err(equipment_not_found(data.equipment_id));
        }
        let request = tx.request_insert(&new_request).await?;
        tx.commit().await?;

        tracing::info!(
            "Created {} request {} on equipment {}",
            request.request_type,
            request.id,
            request.equipment_id
        );
        Ok(request)
    }

    /// Move a request to `status`, optionally recording the repair duration.
    ///
    /// Scrapping a request marks its equipment UNUSABLE in the same transaction;
    /// if the equipment is gone the whole change is rolled back.
    pub async fn update_status(
        &self,
        id: i32,
        status: RequestStatus,
        duration: Option<i32>,
    ) -> AppResult<MaintenanceRequest> {
        if let Some(hours) = duration {
            if hours < 0 {
                return Err(AppError::Validation(format!(
                    "Duration must be non-negative, got {}",
                    hours
                )));
            }
        }

        let mut tx = self.store.begin().await?;

        let current = tx
            .request_get_for_update(id)
            .await?
            .ok_or_else(|| request_not_found(id))?;
        self.policy.check(id, current.status, status)?;

        let change = RequestChange {
            status: Some(status),
            duration,
            ..Default::default()
        };
        let updated = tx
            .request_update(id, &change)
            .await?
            .ok_or_else(|| request_not_found(id))?;

        if status == RequestStatus::Scrap {
            tx.equipment_set_status(updated.equipment_id, EquipmentStatus::Unusable)
                .await?
                .ok_or_else(|| equipment_not_found(updated.equipment_id))?;
        }

        tx.commit().await?;

        tracing::info!("Request {} moved {} -> {}", id, current.status, status);
        if status == RequestStatus::Scrap {
            tracing::info!("Equipment {} marked UNUSABLE", updated.equipment_id);
        }
        Ok(updated)
    }

    /// Assign a technician; the request is moved to IN_PROGRESS whatever its status.
    pub async fn assign(&self, id: i32, user_id: i32) -> AppResult<RequestDetails> {
        let mut tx = self.store.begin().await?;

        let current = tx
            .request_get_for_update(id)
            .await?
            .ok_or_else(|| request_not_found(id))?;
        let user = tx
            .user_get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        self.policy.check(id, current.status, RequestStatus::InProgress)?;

        let change = RequestChange {
            status: Some(RequestStatus::InProgress),
            assigned_to_id: Some(user.id),
            ..Default::default()
        };
        let request = tx
            .request_update(id, &change)
            .await?
            .ok_or_else(|| request_not_found(id))?;
        let equipment = tx
            .equipment_get(request.equipment_id)
            .await?
            .ok_or_else(|| equipment_not_found(request.equipment_id))?;

        tx.commit().await?;

        tracing::info!("Request {} assigned to {} ({})", id, user.name, user.id);
        Ok(RequestDetails {
            request,
            equipment,
            assigned_to: Some(user.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::equipment::{CreateEquipment, Equipment},
        repository::InMemoryStore,
        services::equipment::EquipmentService,
    };

    struct Fixture {
        store: InMemoryStore,
        requests: RequestsService<InMemoryStore>,
        equipment: EquipmentService<InMemoryStore>,
    }

    fn fixture(policy: TransitionPolicy) -> Fixture {
        let store = InMemoryStore::new();
        Fixture {
            requests: RequestsService::new(store.clone(), policy),
            equipment: EquipmentService::new(store.clone()),
            store,
        }
    }

    impl Fixture {
        async fn register(&self, serial: &str) -> Equipment {
            self.equipment
                .create(&CreateEquipment {
                    name: format!("Press {}", serial),
                    serial_number: serial.to_string(),
                    location: "Workshop".to_string(),
                    department: None,
                    purchase_date: "2023-01-10".to_string(),
                    warranty_end: None,
                    maintenance_team_id: None,
                })
                .await
                .unwrap()
        }

        async fn report(&self, equipment_id: i32) -> MaintenanceRequest {
            self.requests
                .create(&CreateRequest {
                    title: "Hydraulic leak".to_string(),
                    request_type: "CORRECTIVE".to_string(),
                    priority: "HIGH".to_string(),
                    equipment_id,
                    ..Default::default()
                })
                .await
                .unwrap()
        }

        async fn equipment_status(&self, id: i32) -> EquipmentStatus {
            self.store.equipment_get(id).await.unwrap().unwrap().status
        }
    }

    #[tokio::test]
    async fn test_scrap_marks_equipment_unusable() {
        let f = fixture(TransitionPolicy::Permissive);
        let e1 = f.register("E1").await;
        let r1 = f.report(e1.id).await;
        assert_eq!(r1.status, RequestStatus::New);
        assert_eq!(f.equipment_status(e1.id).await, EquipmentStatus::Operational);

        let updated = f.requests.update_status(r1.id, RequestStatus::Scrap, None).await.unwrap();
        assert_eq!(updated.status, RequestStatus::Scrap);
        assert_eq!(f.equipment_status(e1.id).await, EquipmentStatus::Unusable);

        // Unrelated work afterwards does not revert the equipment
        let other = f.register("E9").await;
        let r9 = f.report(other.id).await;
        f.requests.update_status(r9.id, RequestStatus::Repaired, Some(1)).await.unwrap();
        assert_eq!(f.equipment_status(e1.id).await, EquipmentStatus::Unusable);
    }

    #[tokio::test]
    async fn test_scrap_twice_is_idempotent() {
        let f = fixture(TransitionPolicy::Permissive);
        let e1 = f.register("E1").await;
        let r1 = f.report(e1.id).await;

        f.requests.update_status(r1.id, RequestStatus::Scrap, None).await.unwrap();
        let again = f.requests.update_status(r1.id, RequestStatus::Scrap, None).await.unwrap();
        assert_eq!(again.status, RequestStatus::Scrap);
        assert_eq!(f.equipment_status(e1.id).await, EquipmentStatus::Unusable);
    }

    #[tokio::test]
    async fn test_repaired_with_duration_leaves_equipment_alone() {
        let f = fixture(TransitionPolicy::Permissive);
        let e2 = f.register("E2").await;
        let r2 = f.report(e2.id).await;

        let updated = f.requests.update_status(r2.id, RequestStatus::Repaired, Some(3)).await.unwrap();
        assert_eq!(updated.status, RequestStatus::Repaired);
        assert_eq!(updated.duration, Some(3));
        assert_eq!(f.equipment_status(e2.id).await, EquipmentStatus::Operational);
    }

    #[tokio::test]
    async fn test_non_scrap_updates_never_touch_equipment() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E3").await;
        let r = f.report(e.id).await;

        for status in [RequestStatus::InProgress, RequestStatus::Repaired, RequestStatus::New] {
            f.requests.update_status(r.id, status, None).await.unwrap();
            assert_eq!(f.equipment_status(e.id).await, EquipmentStatus::Operational);
        }
    }

    #[tokio::test]
    async fn test_duration_is_kept_for_any_status() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E4").await;
        let r = f.report(e.id).await;

        let updated = f.requests.update_status(r.id, RequestStatus::InProgress, Some(5)).await.unwrap();
        assert_eq!(updated.duration, Some(5));
        let updated = f.requests.update_status(r.id, RequestStatus::Repaired, None).await.unwrap();
        assert_eq!(updated.duration, Some(5));
    }

    #[tokio::test]
    async fn test_negative_duration_is_rejected() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E5").await;
        let r = f.report(e.id).await;

        let err = f.requests.update_status(r.id, RequestStatus::Repaired, Some(-1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(f.requests.get(r.id).await.unwrap().request.status, RequestStatus::New);
    }

    #[tokio::test]
    async fn test_update_unknown_request_is_not_found() {
        let f = fixture(TransitionPolicy::Permissive);
        let err = f.requests.update_status(42, RequestStatus::Scrap, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scrap_with_missing_equipment_rolls_back() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E6").await;
        let r = f.report(e.id).await;
        f.store.remove_equipment(e.id).await;

        let err = f.requests.update_status(r.id, RequestStatus::Scrap, Some(2)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("Equipment")));

        let history = f.store.requests_for_equipment(e.id).await.unwrap();
        assert_eq!(history[0].status, RequestStatus::New);
        assert_eq!(history[0].duration, None);
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_status() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E7").await;

        let request = f
            .requests
            .create(&CreateRequest {
                title: "Quarterly lubrication".to_string(),
                request_type: "PREVENTIVE".to_string(),
                priority: "MEDIUM".to_string(),
                equipment_id: e.id,
                scheduled_date: Some("2025-06-01".to_string()),
                status: Some("SCRAP".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(request.status, RequestStatus::New);
        assert_eq!(request.request_type, RequestType::Preventive);
        assert!(request.scheduled_date.is_some());
        assert_eq!(f.equipment_status(e.id).await, EquipmentStatus::Operational);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E8").await;
        let base = || CreateRequest {
            title: "Broken belt".to_string(),
            request_type: "CORRECTIVE".to_string(),
            priority: "LOW".to_string(),
            equipment_id: e.id,
            ..Default::default()
        };

        let bad_type = CreateRequest { request_type: "URGENT".to_string(), ..base() };
        let bad_priority = CreateRequest { priority: "CRITICAL".to_string(), ..base() };
        let bad_date = CreateRequest { scheduled_date: Some("tomorrow".to_string()), ..base() };
        let no_title = CreateRequest { title: String::new(), ..base() };
        let blank_title = CreateRequest { title: "   ".to_string(), ..base() };

        for data in [bad_type, bad_priority, bad_date, no_title, blank_title] {
            let err = f.requests.create(&data).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?}", data);
        }

        let missing_equipment = CreateRequest { equipment_id: 404, ..base() };
        let err = f.requests.create(&missing_equipment).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(f.requests.list(&RequestQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assign_after_repaired_forces_in_progress() {
        let f = fixture(TransitionPolicy::Permissive);
        let u1 = f.store.add_user("Alice (IT)", "alice@gearguard.com", None).await;
        let e2 = f.register("E2").await;
        let r2 = f.report(e2.id).await;
        f.requests.update_status(r2.id, RequestStatus::Repaired, Some(3)).await.unwrap();

        let details = f.requests.assign(r2.id, u1.id).await.unwrap();
        assert_eq!(details.request.status, RequestStatus::InProgress);
        assert_eq!(details.request.assigned_to_id, Some(u1.id));
        assert_eq!(details.request.duration, Some(3));
        let assignee = details.assigned_to.unwrap();
        assert_eq!(assignee.name, "Alice (IT)");
        assert_eq!(details.equipment.id, e2.id);
    }

    #[tokio::test]
    async fn test_assign_unknown_user_changes_nothing() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("E10").await;
        let r = f.report(e.id).await;

        let err = f.requests.assign(r.id, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("User")));

        let stored = f.requests.get(r.id).await.unwrap();
        assert_eq!(stored.request.status, RequestStatus::New);
        assert!(stored.assigned_to.is_none());

        let u = f.store.add_user("Bob (Mech)", "bob@gearguard.com", None).await;
        let err = f.requests.assign(77, u.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("request")));
    }

    #[tokio::test]
    async fn test_strict_policy_refuses_reopening() {
        let f = fixture(TransitionPolicy::Strict);
        let u = f.store.add_user("Bob (Mech)", "bob@gearguard.com", None).await;
        let e = f.register("E11").await;
        let r = f.report(e.id).await;

        let err = f.requests.update_status(r.id, RequestStatus::Repaired, None).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        f.requests.assign(r.id, u.id).await.unwrap();
        f.requests.update_status(r.id, RequestStatus::Repaired, Some(4)).await.unwrap();

        let err = f.requests.update_status(r.id, RequestStatus::New, None).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
        let err = f.requests.assign(r.id, u.id).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        let stored = f.requests.get(r.id).await.unwrap();
        assert_eq!(stored.request.status, RequestStatus::Repaired);
    }

    #[tokio::test]
    async fn test_history_and_team_filter() {
        let f = fixture(TransitionPolicy::Permissive);
        let mechanics = f.store.add_team("Mechanics").await;
        let press = f
            .equipment
            .create(&CreateEquipment {
                name: "Press".to_string(),
                serial_number: "P-1".to_string(),
                location: "Hall A".to_string(),
                department: Some("Production".to_string()),
                purchase_date: "2022-05-01".to_string(),
                warranty_end: Some("2026-05-01".to_string()),
                maintenance_team_id: Some(mechanics.id),
            })
            .await
            .unwrap();
        let laptop = f.register("L-1").await;

        let first = f.report(press.id).await;
        let second = f.report(press.id).await;
        f.report(laptop.id).await;

        let history = f.requests.history(press.id).await.unwrap();
        let ids: Vec<i32> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let filtered = f
            .requests
            .list(&RequestQuery {
                team_id: Some(mechanics.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|d| d.equipment.id == press.id));

        let err = f.requests.history(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_type_filter_for_calendar() {
        let f = fixture(TransitionPolicy::Permissive);
        let e = f.register("C-1").await;
        f.report(e.id).await;
        f.requests
            .create(&CreateRequest {
                title: "Filter change".to_string(),
                request_type: "preventive".to_string(),
                priority: "low".to_string(),
                equipment_id: e.id,
                scheduled_date: Some("2025-02-03T09:00:00Z".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let preventive = f
            .requests
            .list(&RequestQuery {
                request_type: Some(RequestType::Preventive),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(preventive.len(), 1);
        assert_eq!(preventive[0].request.title, "Filter change");
    }
}
