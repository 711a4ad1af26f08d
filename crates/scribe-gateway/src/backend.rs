use scribe_core::config::BackendsConfig;
use scribe_core::BackendId;

/// A resolved backend: identifier, label and invocation URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRef {
    pub id: BackendId,
    pub name: String,
    pub url: String,
}

/// Read-only table of every backend, built once at startup.
#[derive(Debug, Clone)]
pub struct BackendTable {
    entries: [BackendRef; 4],
}

impl BackendTable {
    pub fn from_config(config: &BackendsConfig) -> Self {
        let entry = |id: BackendId| {
            let backend = config.get(id);
            BackendRef {
                id,
                name: backend.name.clone(),
                url: backend.url.clone(),
            }
        };
        Self {
            entries: BackendId::ALL.map(entry),
        }
    }

    pub fn get(&self, id: BackendId) -> &BackendRef {
        // Entries are laid out in `BackendId::ALL` order.
        &self.entries[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendRef> {
        self.entries.iter()
    }
}
