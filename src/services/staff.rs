//! Teams and technicians (read-only reference data)

use crate::{
    error::AppResult,
    models::{team::Team, user::User},
    repository::{MaintenanceStore, Repository},
};

#[derive(Clone)]
pub struct StaffService<S: MaintenanceStore = Repository> {
    store: S,
}

impl<S: MaintenanceStore> StaffService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list_teams(&self) -> AppResult<Vec<Team>> {
        self.store.teams_list().await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.users_list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    #[tokio::test]
    async fn test_lists_are_sorted_by_name() {
        let store = InMemoryStore::new();
        let mech = store.add_team("Mechanics").await;
        store.add_team("IT Support").await;
        store.add_user("Bob (Mech)", "bob@gearguard.com", Some(mech.id)).await;
        store.add_user("Alice (IT)", "alice@gearguard.com", None).await;

        let service = StaffService::new(store);
        let teams: Vec<String> = service.list_teams().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(teams, vec!["IT Support", "Mechanics"]);

        let users = service.list_users().await.unwrap();
        assert_eq!(users[0].name, "Alice (IT)");
        assert_eq!(users[1].team_id, Some(mech.id));
    }
}
