//! Session Manager (C4): binds client-facing session ids to tasks, tracks
//! last-activity, and expires idle sessions via a background sweeper.

use super::types::Session;
use crate::ids::new_id;
use chrono::Utc;
use dashmap::DashMap;
use std::time::Duration;

pub struct SessionManager {
    sessions: DashMap<String, Session>,
    task_index: DashMap<String, String>,
    timeout: Duration,
}

impl SessionManager {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            task_index: DashMap::new(),
            timeout,
        }
    }

    /// Allocate a session bound to `task_id`, installing it in both indices.
    pub fn create_session(&self, task_id: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            session_id: new_id(),
            task_id: task_id.to_string(),
            created_at: now,
            last_activity: now,
        };
        self.task_index.insert(task_id.to_string(), session.session_id.clone());
        self.sessions.insert(session.session_id.clone(), session.clone());
        session
    }

    /// Look up a session, touching its `last_activity` on a hit. Returns
    /// `None` and removes the entry if it has idle-timed-out.
    pub fn get_session(&self, session_id: &str) -> Option<Session> {
        self.sessions.remove_if(session_id, |_, s| self.is_expired(s));

        let mut entry = self.sessions.get_mut(session_id)?;
        entry.last_activity = Utc::now();
        Some(entry.clone())
    }

    pub fn session_for_task(&self, task_id: &str) -> Option<Session> {
        let session_id = self.task_index.get(task_id)?.clone();
        self.get_session(&session_id)
    }

    /// Remove a session unconditionally, e.g. after `complete_task`'s
    /// response has been sent (spec §4.4's "immediate removal" grace policy).
    pub fn remove_session(&self, session_id: &str) {
        if let Some((_, session)) = self.sessions.remove(session_id) {
            self.task_index.remove(&session.task_id);
        }
    }

    /// Delete every currently-expired session. Uses `remove_if` so a
    /// session mid-touch by a concurrent `get_session` call is re-checked
    /// under the same shard lock rather than blindly deleted.
    pub fn sweep_expired(&self) -> usize {
        let candidates: Vec<String> = self
            .sessions
            .iter()
            .filter(|e| self.is_expired(e.value()))
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0;
        for session_id in candidates {
            if self.sessions.remove_if(&session_id, |_, s| self.is_expired(s)).is_some() {
                self.task_index.retain(|_, sid| sid != &session_id);
                removed += 1;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    fn is_expired(&self, session: &Session) -> bool {
        let idle = Utc::now().signed_duration_since(session.last_activity);
        idle.num_seconds().max(0) as u64 > self.timeout.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_touches_last_activity() {
        let manager = SessionManager::new(Duration::from_secs(3600));
        let session = manager.create_session("task-1");
        let fetched = manager.get_session(&session.session_id).unwrap();
        assert_eq!(fetched.task_id, "task-1");
    }

    #[test]
    fn unknown_session_id_returns_none() {
        let manager = SessionManager::new(Duration::from_secs(3600));
        assert!(manager.get_session("not-a-session").is_none());
    }

    #[test]
    fn expired_session_is_evicted_on_lookup() {
        let manager = SessionManager::new(Duration::from_secs(0));
        let session = manager.create_session("task-1");
        std::thread::sleep(Duration::from_millis(1100));
        assert!(manager.get_session(&session.session_id).is_none());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn sweep_expired_removes_idle_sessions_and_their_task_index_entries() {
        let manager = SessionManager::new(Duration::from_secs(0));
        manager.create_session("task-1");
        manager.create_session("task-2");
        std::thread::sleep(Duration::from_millis(1100));

        let removed = manager.sweep_expired();
        assert_eq!(removed, 2);
        assert_eq!(manager.len(), 0);
        assert!(manager.session_for_task("task-1").is_none());
    }

    #[test]
    fn sweep_expired_leaves_active_sessions_alone() {
        let manager = SessionManager::new(Duration::from_secs(3600));
        let session = manager.create_session("task-1");
        let removed = manager.sweep_expired();
        assert_eq!(removed, 0);
        assert!(manager.get_session(&session.session_id).is_some());
    }

    #[test]
    fn session_for_task_resolves_via_secondary_index() {
        let manager = SessionManager::new(Duration::from_secs(3600));
        let session = manager.create_session("task-7");
        let resolved = manager.session_for_task("task-7").unwrap();
        assert_eq!(resolved.session_id, session.session_id);
    }

    #[test]
    fn remove_session_clears_both_indices() {
        let manager = SessionManager::new(Duration::from_secs(3600));
        let session = manager.create_session("task-1");
        manager.remove_session(&session.session_id);
        assert!(manager.get_session(&session.session_id).is_none());
        assert!(manager.session_for_task("task-1").is_none());
    }
}
