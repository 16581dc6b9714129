//! Profile Cache: an explicit, shared cache in front of a `ProfileStore`.
//!
//! Held in `AppState` and passed by reference. Writes go through the store and
//! evict the cached entry, so the next read reloads the stored version. Each
//! eviction bumps a per-user generation; a load that was in flight across an
//! eviction returns its result but does not cache it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::ApplicantProfile;
use crate::profiles::store::{ProfileError, ProfileStore};

#[derive(Default)]
struct CacheState {
    entries: HashMap<Uuid, Arc<ApplicantProfile>>,
    generations: HashMap<Uuid, u64>,
}

impl CacheState {
    fn generation(&self, user_id: Uuid) -> u64 {
        self.generations.get(&user_id).copied().unwrap_or(0)
    }
}

pub struct ProfileCache {
    store: Arc<dyn ProfileStore>,
    state: RwLock<CacheState>,
}

impl ProfileCache {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Returns the cached profile, loading it from the store on a miss.
    pub async fn get(&self, user_id: Uuid) -> Result<Arc<ApplicantProfile>, ProfileError> {
        let generation = {
            let state = self.state.read().await;
            if let Some(profile) = state.entries.get(&user_id) {
                debug!("Profile cache hit for user {user_id}");
                return Ok(Arc::clone(profile));
            }
            state.generation(user_id)
        };

        debug!("Profile cache miss for user {user_id}");
        let profile = Arc::new(self.store.load_profile(user_id).await?);

        let mut state = self.state.write().await;
        if state.generation(user_id) == generation {
            state.entries.insert(user_id, Arc::clone(&profile));
        } else {
            debug!("Profile for user {user_id} changed during load; not caching it");
        }
        Ok(profile)
    }

    /// Persists `profile` and invalidates the cached copy.
    pub async fn save(&self, user_id: Uuid, profile: &ApplicantProfile) -> Result<(), ProfileError> {
        self.store.save_profile(user_id, profile).await?;
        self.invalidate(user_id).await;
        Ok(())
    }

    /// Drops the cached entry. Returns whether one was present.
    pub async fn invalidate(&self, user_id: Uuid) -> bool {
        let mut state = self.state.write().await;
        *state.generations.entry(user_id).or_insert(0) += 1;
        state.entries.remove(&user_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::{Mutex, Notify};

    use super::*;

    /// In-memory store that counts loads.
    #[derive(Default)]
    struct CountingStore {
        profiles: Mutex<HashMap<Uuid, ApplicantProfile>>,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ProfileStore for CountingStore {
        async fn load_profile(&self, user_id: Uuid) -> Result<ApplicantProfile, ProfileError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.profiles
                .lock()
                .await
                .get(&user_id)
                .cloned()
                .ok_or(ProfileError::NotFound(user_id))
        }

        async fn save_profile(
            &self,
            user_id: Uuid,
            profile: &ApplicantProfile,
        ) -> Result<(), ProfileError> {
            self.profiles.lock().await.insert(user_id, profile.clone());
            Ok(())
        }
    }

    /// Wraps `CountingStore`; when armed, the next load reads its data and then
    /// waits for `release` before returning it.
    #[derive(Default)]
    struct GatedStore {
        inner: CountingStore,
        armed: AtomicBool,
        load_started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ProfileStore for GatedStore {
        async fn load_profile(&self, user_id: Uuid) -> Result<ApplicantProfile, ProfileError> {
            let loaded = self.inner.load_profile(user_id).await;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.load_started.notify_one();
                self.release.notified().await;
            }
            loaded
        }

        async fn save_profile(
            &self,
            user_id: Uuid,
            profile: &ApplicantProfile,
        ) -> Result<(), ProfileError> {
            self.inner.save_profile(user_id, profile).await
        }
    }

    fn profile_with_summary(summary: &str) -> ApplicantProfile {
        ApplicantProfile {
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_second_get_is_served_from_cache() {
        let store = Arc::new(CountingStore::default());
        let user_id = Uuid::new_v4();
        store
            .save_profile(user_id, &profile_with_summary("v1"))
            .await
            .unwrap();

        let cache = ProfileCache::new(store.clone());
        assert_eq!(cache.get(user_id).await.unwrap().summary, "v1");
        assert_eq!(cache.get(user_id).await.unwrap().summary, "v1");
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_invalidates_cached_entry() {
        let store = Arc::new(CountingStore::default());
        let user_id = Uuid::new_v4();
        let cache = ProfileCache::new(store.clone());

        cache.save(user_id, &profile_with_summary("v1")).await.unwrap();
        assert_eq!(cache.get(user_id).await.unwrap().summary, "v1");

        cache.save(user_id, &profile_with_summary("v2")).await.unwrap();
        assert_eq!(cache.get(user_id).await.unwrap().summary, "v2");
        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_reports_presence() {
        let store = Arc::new(CountingStore::default());
        let user_id = Uuid::new_v4();
        let cache = ProfileCache::new(store.clone());
        assert!(!cache.invalidate(user_id).await);

        cache.save(user_id, &profile_with_summary("v1")).await.unwrap();
        cache.get(user_id).await.unwrap();
        assert!(cache.invalidate(user_id).await);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_cached() {
        let cache = ProfileCache::new(Arc::new(CountingStore::default()));
        let user_id = Uuid::new_v4();
        assert!(matches!(
            cache.get(user_id).await,
            Err(ProfileError::NotFound(_))
        ));
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_save_during_load_does_not_leave_stale_entry() {
        let store = Arc::new(GatedStore::default());
        let user_id = Uuid::new_v4();
        store
            .save_profile(user_id, &profile_with_summary("v1"))
            .await
            .unwrap();
        let cache = Arc::new(ProfileCache::new(store.clone()));

        store.armed.store(true, Ordering::SeqCst);
        let reader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get(user_id).await })
        };

        store.load_started.notified().await;
        cache.save(user_id, &profile_with_summary("v2")).await.unwrap();
        store.release.notify_one();

        let in_flight = reader.await.unwrap().unwrap();
        assert_eq!(in_flight.summary, "v1");
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.get(user_id).await.unwrap().summary, "v2");
    }
}
