//! Fixed-slot hash table mapping extension keys to bucket trees.

use std::num::NonZeroUsize;

use compact_str::CompactString;

use crate::record::FileRecord;
use crate::tree::BucketTree;

/// Slot count used when none is configured.
pub const DEFAULT_SLOT_COUNT: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Map an extension key to a slot: the sum of its UTF-8 bytes modulo
/// `slot_count`.
///
/// Distinct extensions can share a slot; the index chains them.
pub fn hash_extension(extension: &str, slot_count: NonZeroUsize) -> usize {
    let sum: u64 = extension.bytes().map(u64::from).sum();
    (sum % slot_count.get() as u64) as usize
}

/// One link in a slot's collision chain, owning one extension's tree.
#[derive(Debug, Clone)]
pub struct Bucket {
    extension: CompactString,
    tree: BucketTree,
    next: Option<Box<Bucket>>,
}

impl Bucket {
    fn new(extension: &str, next: Option<Box<Bucket>>) -> Self {
        Self {
            extension: extension.into(),
            tree: BucketTree::new(),
            next,
        }
    }

    /// The extension key this bucket holds records for.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Records for this extension, ordered by name.
    pub fn tree(&self) -> &BucketTree {
        &self.tree
    }

    /// Name of the folder this bucket's files are sorted into.
    pub fn folder_name(&self) -> String {
        format!("{}_files", self.extension)
    }

    fn find<'a>(mut chain: Option<&'a Bucket>, extension: &str) -> Option<&'a Bucket> {
        while let Some(bucket) = chain {
            if bucket.extension == extension {
                return Some(bucket);
            }
            chain = bucket.next.as_deref();
        }
        None
    }

    fn find_mut<'a>(mut chain: Option<&'a mut Bucket>, extension: &str) -> Option<&'a mut Bucket> {
        while let Some(bucket) = chain {
            if bucket.extension == extension {
                return Some(bucket);
            }
            chain = bucket.next.as_deref_mut();
        }
        None
    }
}

impl Drop for Bucket {
    // Unlink the chain one bucket at a time.
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut bucket) = next {
            next = bucket.next.take();
        }
    }
}

/// Hash table from extension key to [`BucketTree`], chaining on collision.
///
/// Every bucket reachable from slot `i` has a key hashing to `i`, and each
/// distinct key has exactly one bucket.
#[derive(Debug, Clone)]
pub struct ExtensionIndex {
    slots: Box<[Option<Box<Bucket>>]>,
    slot_count: NonZeroUsize,
    file_count: usize,
}

impl ExtensionIndex {
    /// Create an index with [`DEFAULT_SLOT_COUNT`] slots.
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOT_COUNT)
    }

    /// Create an index with a fixed number of slots.
    pub fn with_slots(slot_count: NonZeroUsize) -> Self {
        Self {
            slots: (0..slot_count.get()).map(|_| None).collect(),
            slot_count,
            file_count: 0,
        }
    }

    /// Number of slots in the table.
    pub fn slot_count(&self) -> NonZeroUsize {
        self.slot_count
    }

    /// Slot that `extension` hashes to.
    pub fn slot_of(&self, extension: &str) -> usize {
        hash_extension(extension, self.slot_count)
    }

    /// Insert a record under `extension`, creating the bucket on first use.
    ///
    /// New buckets are pushed at the head of the slot's chain.
    pub fn insert(&mut self, extension: &str, record: FileRecord) {
        let slot = &mut self.slots[hash_extension(extension, self.slot_count)];

        match Bucket::find_mut(slot.as_deref_mut(), extension) {
            Some(bucket) => bucket.tree.insert(record),
            None => {
                let mut bucket = Box::new(Bucket::new(extension, slot.take()));
                bucket.tree.insert(record);
                *slot = Some(bucket);
            }
        }

        self.file_count += 1;
    }

    /// Insert a record under its own extension.
    pub fn insert_record(&mut self, record: FileRecord) {
        let extension = CompactString::new(record.extension());
        self.insert(&extension, record);
    }

    /// Find the tree for an exact extension key.
    pub fn lookup(&self, extension: &str) -> Option<&BucketTree> {
        self.bucket(extension).map(Bucket::tree)
    }

    /// Find the bucket for an exact extension key.
    pub fn bucket(&self, extension: &str) -> Option<&Bucket> {
        let slot = &self.slots[self.slot_of(extension)];
        Bucket::find(slot.as_deref(), extension)
    }

    /// Iterate buckets in slot order, then chain order.
    ///
    /// Slot order is not alphabetical.
    pub fn buckets(&self) -> Buckets<'_> {
        Buckets {
            slots: self.slots.iter(),
            chain: None,
        }
    }

    /// Buckets chained at one slot, head first.
    pub fn chain(&self, slot: usize) -> impl Iterator<Item = &Bucket> {
        let mut link = self.slots.get(slot).and_then(|s| s.as_deref());
        std::iter::from_fn(move || {
            let bucket = link?;
            link = bucket.next.as_deref();
            Some(bucket)
        })
    }

    /// Number of distinct extensions.
    pub fn extension_count(&self) -> usize {
        self.buckets().count()
    }

    /// Number of indexed files.
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Total size in bytes of all indexed files.
    pub fn total_size(&self) -> u64 {
        self.buckets().map(|b| b.tree.total_size()).sum()
    }

    /// Check if nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }
}

impl Default for ExtensionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ExtensionIndex {
    type Item = &'a Bucket;
    type IntoIter = Buckets<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets()
    }
}

/// Iterator over every bucket of an [`ExtensionIndex`].
#[derive(Debug, Clone)]
pub struct Buckets<'a> {
    slots: std::slice::Iter<'a, Option<Box<Bucket>>>,
    chain: Option<&'a Bucket>,
}

impl<'a> Iterator for Buckets<'a> {
    type Item = &'a Bucket;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(bucket) = self.chain {
                self.chain = bucket.next.as_deref();
                return Some(bucket);
            }
            self.chain = self.slots.next()?.as_deref();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, extension: &str) -> FileRecord {
        FileRecord::new(name, extension, 1, format!("/src/{name}"))
    }

    #[test]
    fn test_hash_sums_bytes() {
        let slots = NonZeroUsize::new(10).unwrap();
        // 't' + 'x' + 't' = 116 + 120 + 116 = 352
        assert_eq!(hash_extension("txt", slots), 2);
        assert_eq!(hash_extension("", slots), 0);
        assert_eq!(hash_extension("txt", slots), hash_extension("txt", slots));
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut index = ExtensionIndex::new();
        index.insert("txt", record("b.txt", "txt"));
        index.insert("txt", record("a.txt", "txt"));
        index.insert("jpg", record("c.jpg", "jpg"));

        let txt: Vec<_> = index.lookup("txt").unwrap().iter().map(|r| r.name()).collect();
        assert_eq!(txt, ["a.txt", "b.txt"]);
        assert_eq!(index.lookup("jpg").unwrap().len(), 1);
        assert!(index.lookup("png").is_none());
        assert_eq!(index.file_count(), 3);
        assert_eq!(index.extension_count(), 2);
    }

    #[test]
    fn test_collisions_are_chained() {
        let mut index = ExtensionIndex::new();
        // "ab" and "ba" have the same byte sum
        index.insert("ab", record("x.ab", "ab"));
        index.insert("ba", record("y.ba", "ba"));

        assert_eq!(index.slot_of("ab"), index.slot_of("ba"));
        assert_eq!(index.chain(index.slot_of("ab")).count(), 2);
        assert_eq!(index.lookup("ab").unwrap().iter().next().unwrap().name(), "x.ab");
        assert_eq!(index.lookup("ba").unwrap().iter().next().unwrap().name(), "y.ba");
    }

    #[test]
    fn test_new_bucket_goes_to_chain_head() {
        let mut index = ExtensionIndex::new();
        index.insert("ab", record("x.ab", "ab"));
        index.insert("ba", record("y.ba", "ba"));

        let keys: Vec<_> = index.chain(index.slot_of("ab")).map(|b| b.extension()).collect();
        assert_eq!(keys, ["ba", "ab"]);
    }

    #[test]
    fn test_buckets_in_slot_order() {
        let mut index = ExtensionIndex::with_slots(NonZeroUsize::new(7).unwrap());
        for ext in ["txt", "jpg", "rs", "md", "", "toml"] {
            index.insert(ext, record(&format!("f.{ext}"), ext));
        }

        let slots: Vec<_> = index.buckets().map(|b| index.slot_of(b.extension())).collect();
        let mut sorted = slots.clone();
        sorted.sort();
        assert_eq!(slots, sorted);
        assert_eq!(index.buckets().count(), 6);
    }

    #[test]
    fn test_single_slot() {
        let mut index = ExtensionIndex::with_slots(NonZeroUsize::MIN);
        index.insert("a", record("1.a", "a"));
        index.insert("b", record("2.b", "b"));
        index.insert("a", record("3.a", "a"));

        assert_eq!(index.chain(0).count(), 2);
        assert_eq!(index.lookup("a").unwrap().len(), 2);
        assert_eq!(index.lookup("b").unwrap().len(), 1);
    }

    #[test]
    fn test_folder_name() {
        let mut index = ExtensionIndex::new();
        index.insert("", record("README", ""));
        index.insert("pdf", record("a.pdf", "pdf"));
        assert_eq!(index.bucket("").unwrap().folder_name(), "_files");
        assert_eq!(index.bucket("pdf").unwrap().folder_name(), "pdf_files");
    }

    #[test]
    fn test_long_chain_drops() {
        let mut index = ExtensionIndex::with_slots(NonZeroUsize::MIN);
        for i in 0..20_000 {
            let ext = format!("e{i}");
            index.insert(&ext, record(&format!("f.{ext}"), &ext));
        }
        assert_eq!(index.extension_count(), 20_000);
        drop(index);
    }
}
