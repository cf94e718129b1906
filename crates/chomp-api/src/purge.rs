use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use chomp_persist::{ForumStore, Result};

use crate::config::PurgeConfig;

/// Delete placeholder profiles older than `max_age_days`.
pub async fn purge_placeholders(store: &dyn ForumStore, max_age_days: i64) -> Result<u64> {
    let cutoff = Utc::now() - chrono::Duration::days(max_age_days);
    let deleted = store.purge_placeholder_users(cutoff).await?;
    tracing::info!(deleted, cutoff = %cutoff, "Purged placeholder users");
    Ok(deleted)
}

/// Run the purge on a fixed interval. The first run happens immediately.
pub fn spawn_purge_task(store: Arc<dyn ForumStore>, config: PurgeConfig) -> Option<JoinHandle<()>> {
    if !config.enabled {
        tracing::info!("Placeholder purge disabled");
        return None;
    }

    let period = Duration::from_secs(config.interval_hours.max(1) * 60 * 60);
    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) = purge_placeholders(store.as_ref(), config.max_age_days).await {
                tracing::error!(error = %e, "Placeholder purge failed");
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chomp_persist::InMemoryForumStore;
    use chomp_types::{ClassSummary, UserProfile};

    #[tokio::test]
    async fn only_stale_placeholders_are_removed() {
        let store = InMemoryForumStore::new();
        let summary = ClassSummary {
            id: "c1".to_string(),
            name: "Math".to_string(),
            section: None,
            description: None,
        };

        let mut stale = UserProfile::placeholder("p1".to_string(), "old@x.edu".to_string(), summary.clone());
        stale.created = Utc::now() - chrono::Duration::days(15);
        let fresh = UserProfile::placeholder("p2".to_string(), "new@x.edu".to_string(), summary.clone());
        let mut signed_up = UserProfile::placeholder("u1".to_string(), "me@x.edu".to_string(), summary);
        signed_up.uid = "uid-1".to_string();
        signed_up.created = Utc::now() - chrono::Duration::days(30);

        for profile in [stale, fresh, signed_up] {
            store.insert_user(profile).unwrap();
        }

        assert_eq!(purge_placeholders(&store, 14).await.unwrap(), 1);
        assert!(store.users_with_email("old@x.edu").unwrap().is_empty());
        assert_eq!(store.user_count().unwrap(), 2);
    }

    #[test]
    fn disabled_purge_spawns_nothing() {
        let store: Arc<dyn ForumStore> = Arc::new(InMemoryForumStore::new());
        let config = PurgeConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(spawn_purge_task(store, config).is_none());
    }
}
