#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::ItemId;

#[cfg(feature = "std")]
pub(crate) type IdIndexMap = HashMap<ItemId, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type IdIndexMap = BTreeMap<ItemId, usize>;

/// Builds the id → index lookup for one list generation.
///
/// When ids repeat, the first occurrence wins.
pub(crate) fn build_id_index<'a>(ids: impl Iterator<Item = &'a ItemId>) -> IdIndexMap {
    let mut map = IdIndexMap::new();
    for (index, id) in ids.enumerate() {
        if !map.contains_key(id) {
            map.insert(id.clone(), index);
        }
    }
    map
}
