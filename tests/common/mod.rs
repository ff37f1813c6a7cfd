use chatterbox::store::ChatStore;
use chatterbox::substrate::{MemorySubstrate, SledSubstrate};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_store() -> (ChatStore<SledSubstrate>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let substrate =
        SledSubstrate::open(tmp.path().join("chatterbox.db")).expect("failed to open substrate");
    (ChatStore::new(substrate), tmp)
}

#[allow(dead_code)]
pub fn create_memory_store() -> ChatStore<MemorySubstrate> {
    ChatStore::new(MemorySubstrate::new())
}
