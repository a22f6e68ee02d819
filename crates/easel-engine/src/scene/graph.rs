use crate::device::GraphicsDevice;

use super::{Drawable, ObjectLabel};

/// Ordered registry of initialized drawables.
///
/// Append-only: insertion order is the draw and dispatch order, and there is no
/// removal or reordering.
pub struct SceneGraph<D: GraphicsDevice> {
    objects: Vec<Box<dyn Drawable<D>>>,
}

impl<D: GraphicsDevice> SceneGraph<D> {
    #[inline]
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Appends a fully initialized drawable.
    #[inline]
    pub(crate) fn push(&mut self, drawable: Box<dyn Drawable<D>>) {
        self.objects.push(drawable);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates drawables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Drawable<D>> {
        self.objects.iter().map(|d| d.as_ref())
    }

    pub fn labels(&self) -> impl Iterator<Item = &ObjectLabel> {
        self.objects.iter().map(|d| d.label())
    }

    /// Runs `update_geometry` on every drawable in insertion order.
    pub(crate) fn update_all(&mut self) {
        for obj in &mut self.objects {
            obj.update_geometry();
        }
    }
}

impl<D: GraphicsDevice> Default for SceneGraph<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::{Event, StubDrawable, RecordingDevice};
    use crate::scene::ObjectCounter;

    #[test]
    fn preserves_insertion_order() {
        let device = RecordingDevice::new();
        let mut counter = ObjectCounter::new();
        let mut scene: SceneGraph<RecordingDevice> = SceneGraph::new();

        for name in ["A", "B", "C"] {
            scene.push(Box::new(StubDrawable::new(counter.allocate(name), device.log())));
        }

        let kinds: Vec<_> = scene.labels().map(|l| l.kind()).collect();
        assert_eq!(kinds, ["A", "B", "C"]);
        assert_eq!(scene.len(), 3);
        assert!(!scene.is_empty());
    }

    #[test]
    fn update_all_visits_each_drawable_once_in_order() {
        let device = RecordingDevice::new();
        let mut counter = ObjectCounter::new();
        let mut scene: SceneGraph<RecordingDevice> = SceneGraph::new();
        scene.push(Box::new(StubDrawable::new(counter.allocate("A"), device.log())));
        scene.push(Box::new(StubDrawable::new(counter.allocate("B"), device.log())));

        scene.update_all();

        assert_eq!(
            device.events(),
            vec![Event::Update("A".into()), Event::Update("B".into())]
        );
    }
}
