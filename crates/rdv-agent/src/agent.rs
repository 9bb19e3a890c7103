use rdv_barrier::CallCountBarrier;
use rdv_registry::{collect_current_names, collect_names};
use rdv_store::{CoordinationStore, PrefixStore};
use rdv_types::{NameTable, WorkerId, WorkerName};
use tracing::info;

use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};

/// One worker's rendezvous handle.
///
/// Wraps the shared store in the configured prefix, so agents of different
/// groups can share a backing store. Owns the barrier session counter for
/// this worker.
pub struct Agent<S> {
    config: AgentConfig,
    store: PrefixStore<S>,
    barrier: CallCountBarrier,
    names: Option<NameTable>,
}

impl<S: CoordinationStore> Agent<S> {
    pub fn new(config: AgentConfig, store: S) -> AgentResult<Self> {
        config.validate()?;
        let store = PrefixStore::new(config.prefix.clone(), store);
        Ok(Self {
            config,
            store,
            barrier: CallCountBarrier::new(),
            names: None,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn id(&self) -> WorkerId {
        self.config.id()
    }

    pub fn name(&self) -> WorkerName {
        self.config.name()
    }

    pub fn store(&self) -> &PrefixStore<S> {
        &self.store
    }

    /// Register this worker with its group.
    ///
    /// With a configured world size this blocks until every worker has
    /// registered; without one it joins the dynamic roster and returns the
    /// workers registered so far. Dynamic registrations must not overlap
    /// (see [`rdv_registry::dynamic`]).
    pub fn register(&mut self) -> AgentResult<&NameTable> {
        let id = self.id();
        let name = self.name();
        let table = match self.config.world_size {
            Some(world_size) => collect_names(&self.store, id, &name, world_size)?,
            None => collect_current_names(&self.store, id, &name)?,
        };
        info!(
            prefix = %self.config.prefix,
            id = %id,
            workers = table.len(),
            "agent registered"
        );
        Ok(&*self.names.insert(table))
    }

    /// The table produced by the last successful [`register`](Self::register).
    pub fn name_table(&self) -> Option<&NameTable> {
        self.names.as_ref()
    }

    /// Look up a peer's id by name.
    pub fn resolve(&self, name: &str) -> AgentResult<WorkerId> {
        let table = self.names.as_ref().ok_or(AgentError::NotRegistered)?;
        table
            .get(&WorkerName::from(name))
            .ok_or_else(|| AgentError::UnknownWorker(name.to_string()))
    }

    /// Wait for the whole group and return its total in-flight call count.
    pub fn sync_call_count(&self, active_calls: i64) -> AgentResult<i64> {
        let world_size = self.config.world_size.ok_or(AgentError::UnknownWorldSize)?;
        Ok(self
            .barrier
            .sync_call_count(&self.store, world_size, active_calls)?)
    }

    /// Number of barrier sessions this agent has entered.
    pub fn barrier_sessions(&self) -> u64 {
        self.barrier.sessions()
    }
}

impl<S> std::fmt::Debug for Agent<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("config", &self.config)
            .field("registered", &self.names.is_some())
            .field("barrier_sessions", &self.barrier.sessions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdv_registry::RegistryError;
    use rdv_store::InMemoryStore;
    use std::sync::Arc;
    use std::thread;

    fn fixed_group(store: &Arc<InMemoryStore>, names: &[&str]) -> Vec<Agent<Arc<InMemoryStore>>> {
        let world_size = names.len() as u32;
        names
            .iter()
            .enumerate()
            .map(|(id, name)| {
                Agent::new(
                    AgentConfig::fixed(id as u32, *name, world_size),
                    Arc::clone(store),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let store = InMemoryStore::new();
        let err = Agent::new(AgentConfig::fixed(2, "x", 2), store).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn fixed_group_registers_and_synchronizes() {
        let store = Arc::new(InMemoryStore::new());
        let agents = fixed_group(&store, &["ps", "w1", "w2"]);

        let handles: Vec<_> = agents
            .into_iter()
            .enumerate()
            .map(|(i, mut agent)| {
                thread::spawn(move || {
                    let table = agent.register().unwrap().clone();
                    let total = agent.sync_call_count(i as i64 + 1).unwrap();
                    (table, total, agent.resolve("w2").unwrap())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (table, total, w2) in &results {
            assert_eq!(table, &results[0].0);
            assert_eq!(table.len(), 3);
            assert_eq!(*total, 6);
            assert_eq!(*w2, WorkerId::new(2));
        }
        // Everything lives under the default prefix.
        assert!(store.keys().unwrap().iter().all(|k| k.starts_with("rdv/")));
    }

    #[test]
    fn dynamic_agents_register_sequentially() {
        let store = Arc::new(InMemoryStore::new());
        let mut tables = Vec::new();
        for (id, name) in ["A", "B", "C"].iter().enumerate() {
            let mut agent =
                Agent::new(AgentConfig::dynamic(id as u32, *name), Arc::clone(&store)).unwrap();
            tables.push(agent.register().unwrap().len());
        }
        assert_eq!(tables, vec![1, 2, 3]);
        assert_eq!(
            store.peek("rdv/AllWorkerInfos").unwrap(),
            Some(b"A-0,B-1,C-2".to_vec())
        );
    }

    #[test]
    fn dynamic_agent_cannot_use_barrier() {
        let store = InMemoryStore::new();
        let agent = Agent::new(AgentConfig::dynamic(0, "A"), store).unwrap();
        assert!(matches!(
            agent.sync_call_count(1),
            Err(AgentError::UnknownWorldSize)
        ));
    }

    #[test]
    fn resolve_before_register_fails() {
        let agent = Agent::new(AgentConfig::fixed(0, "solo", 1), InMemoryStore::new()).unwrap();
        assert!(matches!(agent.resolve("solo"), Err(AgentError::NotRegistered)));
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let mut agent = Agent::new(AgentConfig::fixed(0, "solo", 1), InMemoryStore::new()).unwrap();
        agent.register().unwrap();
        assert_eq!(agent.resolve("solo").unwrap(), WorkerId::new(0));
        assert!(matches!(agent.resolve("ghost"), Err(AgentError::UnknownWorker(_))));
    }

    #[test]
    fn prefixes_isolate_groups_on_one_store() {
        let store = Arc::new(InMemoryStore::new());
        let mut a = Agent::new(
            AgentConfig {
                prefix: "group-a".into(),
                ..AgentConfig::dynamic(0, "same")
            },
            Arc::clone(&store),
        )
        .unwrap();
        let mut b = Agent::new(
            AgentConfig {
                prefix: "group-b".into(),
                ..AgentConfig::dynamic(0, "same")
            },
            Arc::clone(&store),
        )
        .unwrap();

        // Same id and name would clash inside one group.
        a.register().unwrap();
        b.register().unwrap();
        assert_eq!(a.name_table(), b.name_table());
    }

    #[test]
    fn id_clash_surfaces_registry_error() {
        let store = Arc::new(InMemoryStore::new());
        let mut first = Agent::new(AgentConfig::dynamic(0, "A"), Arc::clone(&store)).unwrap();
        let mut second = Agent::new(AgentConfig::dynamic(0, "B"), Arc::clone(&store)).unwrap();

        first.register().unwrap();
        let err = second.register().unwrap_err();
        assert!(matches!(
            err,
            AgentError::Registry(RegistryError::IdAlreadyClaimed { .. })
        ));
        assert!(second.name_table().is_none());
    }

    #[test]
    fn barrier_sessions_advance_per_call() {
        let agent = Agent::new(AgentConfig::fixed(0, "solo", 1), InMemoryStore::new()).unwrap();
        assert_eq!(agent.sync_call_count(2).unwrap(), 2);
        assert_eq!(agent.sync_call_count(9).unwrap(), 9);
        assert_eq!(agent.barrier_sessions(), 2);
    }
}
