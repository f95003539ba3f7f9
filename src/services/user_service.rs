use crate::auth::ProviderUser;
use crate::database::models::{NewUser, User};
use crate::database::Store;

/// Mirror a provider account into the local `users` table.
///
/// The provider stays authoritative, so a failed write is logged and the caller
/// carries on without the local row.
pub async fn mirror_user(store: &dyn Store, user: &ProviderUser, name: Option<String>) -> Option<User> {
    let row = NewUser {
        id: user.id.clone(),
        email: user.email.clone(),
        name,
    };

    match store.upsert_user(row).await {
        Ok(saved) => Some(saved),
        Err(e) => {
            tracing::error!("Failed to sync user {} in database: {}", user.id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    #[tokio::test]
    async fn mirror_inserts_then_refreshes_email() {
        let store = MemoryStore::new();
        let mut account = ProviderUser {
            id: "p-1".into(),
            email: "erin@example.com".into(),
        };

        let first = mirror_user(&store, &account, Some("Erin".into())).await.unwrap();
        assert_eq!(first.name, "Erin");

        account.email = "erin@new.example".into();
        let second = mirror_user(&store, &account, None).await.unwrap();
        assert_eq!(second.name, "Erin");
        assert_eq!(second.email, "erin@new.example");
    }
}
