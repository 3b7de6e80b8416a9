//! The tag runtime handle.

use std::fmt;
use std::sync::Arc;

use tagwire_codec::{WireSink, WireSource, decode, encode, encode_empty};
use tagwire_core::{TagId, TagSet};
use tagwire_registry::TagRegistry;
use tagwire_store::{RecordKey, TagSetStore};
use tracing::{debug, trace, warn};

use crate::error::{RuntimeError, RuntimeResult};
use crate::policy::{MalformedPolicy, RuntimePolicy};

/// Registry, record store and decode policy for one process.
///
/// Extensions receive a shared reference to this handle. They reserve ids
/// during setup, then tag records as they flow through. The host record
/// serializer calls [`on_record_serialized`](Self::on_record_serialized) and
/// [`on_record_deserialized`](Self::on_record_deserialized) right after it
/// has written or read the base record.
pub struct TagRuntime<R: ?Sized> {
    registry: Arc<TagRegistry>,
    store: TagSetStore<R>,
    policy: RuntimePolicy,
}

impl<R: ?Sized> TagRuntime<R> {
    /// Create a runtime with a fresh full-capacity registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(TagRegistry::new()))
    }

    /// Create a runtime over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<TagRegistry>) -> Self {
        Self::from_parts(registry, TagSetStore::new(), RuntimePolicy::default())
    }

    /// Assemble a runtime from its parts.
    #[must_use]
    pub fn from_parts(
        registry: Arc<TagRegistry>,
        store: TagSetStore<R>,
        policy: RuntimePolicy,
    ) -> Self {
        Self {
            registry,
            store,
            policy,
        }
    }

    /// Replace the decode policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RuntimePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The id registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TagRegistry> {
        &self.registry
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &TagSetStore<R> {
        &self.store
    }

    /// The decode policy.
    #[must_use]
    pub fn policy(&self) -> RuntimePolicy {
        self.policy
    }

    /// Reserve a new tag id.
    ///
    /// # Errors
    ///
    /// Fails once the registry is sealed or its limit is reached.
    pub fn reserve(&self) -> RuntimeResult<TagId> {
        Ok(self.registry.reserve()?)
    }

    /// Reserve a new tag id with a label used in log output.
    ///
    /// # Errors
    ///
    /// Same as [`reserve`](Self::reserve).
    pub fn reserve_named(&self, label: impl Into<String>) -> RuntimeResult<TagId> {
        Ok(self.registry.reserve_named(label)?)
    }

    /// End the reservation phase. Returns the number of reserved ids.
    pub fn seal(&self) -> usize {
        self.registry.seal()
    }

    /// Label of `id` if it has one, otherwise its number.
    #[must_use]
    pub fn describe(&self, id: TagId) -> String {
        self.registry.label(id).unwrap_or_else(|| id.to_string())
    }

    /// Set a tag on a record. Setting it twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidTag`](tagwire_core::TagError::InvalidTag)
    /// if `id` was never reserved here.
    pub fn add_tag(&self, record: &Arc<R>, id: TagId) -> RuntimeResult<()> {
        self.registry.validate(id).inspect_err(|e| {
            warn!(record = %RecordKey::of(record), error = %e, "Rejected unreserved tag");
        })?;
        self.store.add_tag(record, id);
        Ok(())
    }

    /// Whether a record carries a tag. Unreserved ids are never set.
    #[must_use]
    pub fn has_tag(&self, record: &Arc<R>, id: TagId) -> bool {
        self.registry.is_valid(id) && self.store.has_tag(record, id)
    }

    /// Clear one tag on a record. Returns `true` if it was set.
    pub fn remove_tag(&self, record: &Arc<R>, id: TagId) -> bool {
        self.store.remove_tag(record, id)
    }

    /// Drop every tag on a record, returning them.
    pub fn clear(&self, record: &Arc<R>) -> Option<TagSet> {
        self.store.clear(record)
    }

    /// Reserved tags carried by a record, ascending.
    #[must_use]
    pub fn tags(&self, record: &Arc<R>) -> Vec<TagId> {
        self.store
            .tags(record)
            .into_iter()
            .filter(|id| self.registry.is_valid(*id))
            .collect()
    }

    /// Remove store entries whose record has been dropped.
    pub fn purge(&self) -> usize {
        self.store.purge()
    }

    /// Append a record's tag block after its serialized base form.
    ///
    /// Untagged records cost a single `0x00` byte. Tags decoded from a peer
    /// but not reserved locally are forwarded unchanged.
    pub fn on_record_serialized<S: WireSink + ?Sized>(&self, record: &Arc<R>, sink: &mut S) {
        let written = self.store.with_tags(record, |tags| {
            encode(tags, &mut *sink);
            tags.len()
        });
        if written.is_none() {
            encode_empty(sink);
        }
        trace!(
            record = %RecordKey::of(record),
            tags = written.unwrap_or(0),
            "Appended tag block"
        );
    }

    /// Consume a record's tag block and attach it to the freshly built
    /// record.
    ///
    /// Under [`MalformedPolicy::Degrade`] a malformed block is logged and the
    /// record comes back untagged. The source may then sit anywhere inside
    /// the bad block.
    ///
    /// # Errors
    ///
    /// Under [`MalformedPolicy::Reject`], returns [`RuntimeError::Codec`]
    /// for a malformed or truncated block.
    pub fn on_record_deserialized<S: WireSource + ?Sized>(
        &self,
        record: Arc<R>,
        source: &mut S,
    ) -> RuntimeResult<Arc<R>> {
        let key = RecordKey::of(&record);
        let tags = match decode(source) {
            Ok(tags) => tags,
            Err(err) => {
                if self.policy.on_malformed == MalformedPolicy::Reject {
                    warn!(record = %key, error = %err, "Rejected malformed tag block");
                    return Err(RuntimeError::Codec(err));
                }
                warn!(record = %key, error = %err, "Dropped malformed tag block");
                self.store.clear(&record);
                return Ok(record);
            },
        };

        if self.policy.warn_unreserved {
            self.report_unreserved(key, &tags);
        }
        if !tags.is_empty() {
            debug!(record = %key, tags = %self.render(&tags), "Received tags");
        }
        self.store.install(&record, tags);
        Ok(record)
    }

    fn report_unreserved(&self, key: RecordKey, tags: &TagSet) {
        let reserved = self.registry.reserved_count();
        let mut unreserved = tags.iter().filter(|id| !self.registry.is_valid(*id));
        if let Some(first) = unreserved.next() {
            let count = unreserved.count().saturating_add(1);
            warn!(
                record = %key,
                tag = %first,
                count,
                reserved,
                "Decoded tags not reserved in this process; peers may disagree on reservation order"
            );
        }
    }

    fn render(&self, tags: &TagSet) -> String {
        let names: Vec<String> = tags.iter().map(|id| self.describe(id)).collect();
        format!("[{}]", names.join(", "))
    }
}

impl<R: ?Sized> Default for TagRuntime<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for TagRuntime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRuntime")
            .field("registry", &self.registry)
            .field("store", &self.store)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagwire_codec::{CodecError, WireReader};
    use tagwire_core::TagError;

    #[derive(Debug)]
    struct Event {
        #[allow(dead_code)]
        name: &'static str,
    }

    fn event(name: &'static str) -> Arc<Event> {
        Arc::new(Event { name })
    }

    fn runtime_with(count: usize) -> (TagRuntime<Event>, Vec<TagId>) {
        let runtime = TagRuntime::new();
        let ids = (0..count).map(|_| runtime.reserve().unwrap()).collect();
        (runtime, ids)
    }

    fn serialize(runtime: &TagRuntime<Event>, record: &Arc<Event>) -> Vec<u8> {
        let mut out = Vec::new();
        runtime.on_record_serialized(record, &mut out);
        out
    }

    #[test]
    fn test_scenario_two_tags() {
        let (sender, ids) = runtime_with(3);
        let record = event("spawn");
        sender.add_tag(&record, ids[0]).unwrap();
        sender.add_tag(&record, ids[2]).unwrap();

        let bytes = serialize(&sender, &record);
        assert_eq!(bytes, [0x01, 0x81, 0x05]);

        let (receiver, _) = runtime_with(3);
        let copy = receiver
            .on_record_deserialized(event("spawn"), &mut &bytes[..])
            .unwrap();
        assert!(receiver.has_tag(&copy, ids[0]));
        assert!(!receiver.has_tag(&copy, ids[1]));
        assert!(receiver.has_tag(&copy, ids[2]));
        assert_eq!(receiver.tags(&copy), [ids[0], ids[2]]);
    }

    #[test]
    fn test_untagged_record_costs_one_byte() {
        let (runtime, _) = runtime_with(1);
        assert_eq!(serialize(&runtime, &event("idle")), [0x00]);
        assert!(runtime.store().is_empty());
    }

    #[test]
    fn test_add_tag_rejects_unreserved() {
        let (runtime, _) = runtime_with(2);
        let record = event("move");
        let unreserved = TagId::new(5).unwrap();

        assert_eq!(
            runtime.add_tag(&record, unreserved),
            Err(RuntimeError::Tag(TagError::InvalidTag {
                id: unreserved,
                reserved: 2
            }))
        );
        assert!(!runtime.has_tag(&record, unreserved));
        assert!(runtime.store().is_empty());
    }

    #[test]
    fn test_add_tag_is_idempotent() {
        let (runtime, ids) = runtime_with(1);
        let record = event("chat");
        runtime.add_tag(&record, ids[0]).unwrap();
        runtime.add_tag(&record, ids[0]).unwrap();

        assert_eq!(runtime.tags(&record), [ids[0]]);
        assert_eq!(serialize(&runtime, &record), [0x01, 0x81, 0x01]);
    }

    #[test]
    fn test_remove_and_clear() {
        let (runtime, ids) = runtime_with(2);
        let record = event("drop");
        runtime.add_tag(&record, ids[0]).unwrap();
        runtime.add_tag(&record, ids[1]).unwrap();

        assert!(runtime.remove_tag(&record, ids[0]));
        assert!(!runtime.remove_tag(&record, ids[0]));
        assert_eq!(runtime.tags(&record), [ids[1]]);

        let cleared = runtime.clear(&record).unwrap();
        assert_eq!(cleared.len(), 1);
        assert_eq!(serialize(&runtime, &record), [0x00]);
    }

    #[test]
    fn test_seal_blocks_reservation() {
        let (runtime, _) = runtime_with(2);
        assert_eq!(runtime.seal(), 2);
        assert_eq!(
            runtime.reserve(),
            Err(RuntimeError::Tag(TagError::RegistrySealed { reserved: 2 }))
        );
    }

    #[test]
    fn test_describe_uses_labels() {
        let runtime = TagRuntime::<Event>::new();
        let named = runtime.reserve_named("protected").unwrap();
        let plain = runtime.reserve().unwrap();
        assert_eq!(runtime.describe(named), "protected");
        assert_eq!(runtime.describe(plain), "tag#1");
    }

    #[test]
    fn test_degrade_on_malformed_block() {
        let (runtime, ids) = runtime_with(1);
        let record = event("broken");
        // Stale tags from an earlier decode must not survive.
        runtime.add_tag(&record, ids[0]).unwrap();

        let bytes = [0x01u8, 0xC1, 0x01];
        let record = runtime
            .on_record_deserialized(record, &mut &bytes[..])
            .unwrap();
        assert!(runtime.tags(&record).is_empty());
        assert!(runtime.store().is_empty());
    }

    #[test]
    fn test_reject_on_malformed_block() {
        let (runtime, _) = runtime_with(1);
        let runtime = runtime
            .with_policy(RuntimePolicy::default().with_on_malformed(MalformedPolicy::Reject));

        let result = runtime.on_record_deserialized(event("broken"), &mut &[0x01u8][..]);
        assert_eq!(
            result.unwrap_err(),
            RuntimeError::Codec(CodecError::UnexpectedEof {
                section: 0,
                context: "slot mask"
            })
        );
    }

    #[test]
    fn test_unreserved_decoded_tags_are_kept_and_forwarded() {
        let (sender, _) = runtime_with(10);
        let record = event("relay");
        sender.add_tag(&record, TagId::new(9).unwrap()).unwrap();
        let bytes = serialize(&sender, &record);

        let (receiver, _) = runtime_with(3);
        let copy = receiver
            .on_record_deserialized(event("relay"), &mut &bytes[..])
            .unwrap();
        assert!(!receiver.has_tag(&copy, TagId::new(9).unwrap()));
        assert!(receiver.tags(&copy).is_empty());

        // A relay forwards the block unchanged.
        assert_eq!(serialize(&receiver, &copy), bytes);
    }

    #[test]
    fn test_deserialize_stops_after_block() {
        let (runtime, ids) = runtime_with(1);
        let mut reader = WireReader::new(&[0x01, 0x81, 0x01, 0x2A]);
        let record = runtime
            .on_record_deserialized(event("next"), &mut reader)
            .unwrap();
        assert!(runtime.has_tag(&record, ids[0]));
        assert_eq!(reader.read_u8().unwrap(), 0x2A);
    }

    #[test]
    fn test_runtime_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TagRuntime<Event>>();
        assert_send_sync::<TagRuntime<str>>();
    }
}
