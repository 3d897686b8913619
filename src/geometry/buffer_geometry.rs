//! Buffer geometry holding named per-vertex attributes on the CPU.

use std::collections::BTreeMap;

use crate::core::Id;

/// Attribute name for particle offsets from the burst origin.
pub const ATTR_POSITION: &str = "position";
/// Attribute name for per-particle size multipliers.
pub const ATTR_SIZE: &str = "size";
/// Attribute name for per-particle time multipliers.
pub const ATTR_TIME_MULTIPLIER: &str = "time_multiplier";

/// A flat `f32` array interpreted as items of `item_size` components.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferAttribute {
    /// Raw components.
    pub array: Vec<f32>,
    /// Components per item.
    pub item_size: usize,
}

impl BufferAttribute {
    /// Create an attribute. `item_size` of 0 is treated as 1.
    pub fn new(array: Vec<f32>, item_size: usize) -> Self {
        Self {
            array,
            item_size: item_size.max(1),
        }
    }

    /// Number of items.
    #[inline]
    pub fn count(&self) -> usize {
        self.array.len() / self.item_size
    }

    /// Item `index` as a slice of `item_size` components.
    pub fn item(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.item_size)?;
        self.array.get(start..start + self.item_size)
    }

    /// Raw bytes for GPU upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.array)
    }

    /// Byte stride between items.
    #[inline]
    pub fn stride(&self) -> u64 {
        (self.item_size * std::mem::size_of::<f32>()) as u64
    }
}

/// A geometry made of named attributes.
#[derive(Debug)]
pub struct BufferGeometry {
    /// Unique ID.
    id: Id,
    /// Attributes by name.
    attributes: BTreeMap<String, BufferAttribute>,
    /// Radius of the sphere around the local origin enclosing every position.
    bounding_radius: Option<f32>,
    /// Set once `dispose` has freed the attribute storage.
    disposed: bool,
}

impl BufferGeometry {
    /// Create a new empty buffer geometry.
    pub fn new() -> Self {
        Self {
            id: Id::new(),
            attributes: BTreeMap::new(),
            bounding_radius: None,
            disposed: false,
        }
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Set (or replace) an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: BufferAttribute) {
        let name = name.into();
        if name == ATTR_POSITION {
            self.bounding_radius = None;
        }
        self.attributes.insert(name, attribute);
    }

    /// Get an attribute by name.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    /// Check whether an attribute exists.
    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Number of vertices, taken from the position attribute.
    pub fn count(&self) -> usize {
        self.attribute(ATTR_POSITION).map_or(0, BufferAttribute::count)
    }

    /// Get the bounding radius, if computed.
    #[inline]
    pub fn bounding_radius(&self) -> Option<f32> {
        self.bounding_radius
    }

    /// Compute the bounding radius from the position attribute.
    pub fn compute_bounding_radius(&mut self) -> f32 {
        let radius = self
            .attribute(ATTR_POSITION)
            .map(|positions| {
                positions
                    .array
                    .chunks_exact(positions.item_size)
                    .map(|p| p.iter().map(|c| c * c).sum::<f32>())
                    .fold(0.0_f32, f32::max)
                    .sqrt()
            })
            .unwrap_or(0.0);
        self.bounding_radius = Some(radius);
        radius
    }

    /// Free every attribute.
    pub fn dispose(&mut self) {
        self.attributes.clear();
        self.bounding_radius = None;
        self.disposed = true;
    }

    /// Check whether the geometry has been disposed.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for BufferGeometry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_count_and_item() {
        let attr = BufferAttribute::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!(attr.count(), 2);
        assert_eq!(attr.item(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(attr.item(2), None);
        assert_eq!(attr.stride(), 12);
        assert_eq!(attr.as_bytes().len(), 24);
    }

    #[test]
    fn test_count_from_position() {
        let mut geometry = BufferGeometry::new();
        assert_eq!(geometry.count(), 0);
        geometry.set_attribute(ATTR_POSITION, BufferAttribute::new(vec![0.0; 9], 3));
        geometry.set_attribute(ATTR_SIZE, BufferAttribute::new(vec![0.5; 3], 1));
        assert_eq!(geometry.count(), 3);
        assert_eq!(
            geometry.attribute_names().collect::<Vec<_>>(),
            vec![ATTR_POSITION, ATTR_SIZE]
        );
    }

    #[test]
    fn test_bounding_radius() {
        let mut geometry = BufferGeometry::new();
        geometry.set_attribute(
            ATTR_POSITION,
            BufferAttribute::new(vec![1.0, 0.0, 0.0, 0.0, -3.0, 4.0], 3),
        );
        assert!((geometry.compute_bounding_radius() - 5.0).abs() < 1e-6);
        assert_eq!(geometry.bounding_radius(), Some(5.0));

        geometry.set_attribute(ATTR_POSITION, BufferAttribute::new(vec![], 3));
        assert_eq!(geometry.bounding_radius(), None);
    }

    #[test]
    fn test_dispose_frees_attributes() {
        let mut geometry = BufferGeometry::new();
        geometry.set_attribute(ATTR_POSITION, BufferAttribute::new(vec![0.0; 3], 3));
        geometry.dispose();
        assert!(geometry.is_disposed());
        assert!(!geometry.has_attribute(ATTR_POSITION));
        assert_eq!(geometry.count(), 0);
    }
}
