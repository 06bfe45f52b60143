//! Element identifiers

use slotmap::{new_key_type, Key, KeyData};

new_key_type! {
    /// Identifies a live element in the page runtime's arena
    pub struct ElementId;
}

impl ElementId {
    /// Convert to a raw u64 representation
    ///
    /// Useful for handing ids across an FFI boundary, such as a DOM
    /// `data-` attribute in the web backend.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild an id from [`ElementId::to_raw`]
    pub fn from_raw(raw: u64) -> Self {
        ElementId::from(KeyData::from_ffi(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_raw_roundtrip_preserves_identity() {
        let mut map: SlotMap<ElementId, ()> = SlotMap::with_key();
        let a = map.insert(());
        let b = map.insert(());

        assert_eq!(ElementId::from_raw(a.to_raw()), a);
        assert_ne!(a.to_raw(), b.to_raw());
        assert!(ElementId::default().is_null());
    }
}
