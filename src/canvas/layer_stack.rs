//! The ordered stack of canvas layers.
//!
//! Layers live in an arena of slots addressed by [`LayerId`]. Freed slots go
//! on a free list and are reused by the next push, so ids stay stable while
//! a layer is alive and top-of-stack operations are O(1). Each layer links
//! to the one above and the one below it; traversal runs bottom to top.

use crate::image::image_formats::Image;
use crate::utils::log::debug;

/// Stable handle to a layer in a [`LayerStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(usize);

impl LayerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One canvas-sized pixel buffer plus its opacity.
#[derive(Debug, Clone)]
pub struct Layer {
    image: Image,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    above: Option<LayerId>,
    below: Option<LayerId>,
}

impl Layer {
    fn new(width: u32, height: u32) -> Self {
        Layer {
            image: Image::new(width, height),
            opacity: 1.0,
            above: None,
            below: None,
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut Image {
        &mut self.image
    }
}

/// Bottom-to-top chain of layers sharing one size.
#[derive(Debug, Clone)]
pub struct LayerStack {
    width: u32,
    height: u32,
    slots: Vec<Option<Layer>>,
    free: Vec<usize>,
    bottom: Option<LayerId>,
    current: Option<LayerId>,
    len: usize,
}

impl LayerStack {
    /// Creates an empty stack for a `width` x `height` canvas.
    pub fn new(width: u32, height: u32) -> Self {
        LayerStack {
            width,
            height,
            slots: Vec::new(),
            free: Vec::new(),
            bottom: None,
            current: None,
            len: 0,
        }
    }

    /// Canvas dimensions every layer in this stack has.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bottom(&self) -> Option<LayerId> {
        self.bottom
    }

    /// The topmost layer, the one strokes go into.
    pub fn current(&self) -> Option<LayerId> {
        self.current
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn current_layer_mut(&mut self) -> Option<&mut Layer> {
        let id = self.current?;
        self.get_mut(id)
    }

    /// Pushes a new transparent layer on top and makes it current.
    ///
    /// The layer takes the size of the current top layer, or the canvas size
    /// when the stack is empty. Opacity starts at 1.
    pub fn add_top_layer(&mut self) -> LayerId {
        let (width, height) = match self.current_layer() {
            Some(top) => top.image.dimensions(),
            None => (self.width, self.height),
        };
        let mut layer = Layer::new(width, height);
        layer.below = self.current;

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(layer);
                LayerId(index)
            }
            None => {
                self.slots.push(Some(layer));
                LayerId(self.slots.len() - 1)
            }
        };

        match self.current {
            Some(top) => {
                if let Some(top) = self.get_mut(top) {
                    top.above = Some(id);
                }
            }
            None => self.bottom = Some(id),
        }
        self.current = Some(id);
        self.len += 1;
        debug!("added layer {} ({} in stack)", id.0, self.len);
        id
    }

    /// Removes the topmost layer and frees its image.
    ///
    /// The layer below becomes current. Removing the only layer leaves the
    /// stack empty; returns `false` if there was nothing to remove.
    pub fn del_top_layer(&mut self) -> bool {
        let Some(top) = self.current else {
            return false;
        };
        let removed = self.slots[top.0].take();
        self.free.push(top.0);
        self.len -= 1;

        let below = removed.and_then(|layer| layer.below);
        match below {
            Some(id) => {
                if let Some(layer) = self.get_mut(id) {
                    layer.above = None;
                }
                self.current = Some(id);
            }
            None => {
                self.bottom = None;
                self.current = None;
            }
        }
        debug!("deleted layer {} ({} left)", top.0, self.len);
        true
    }

    /// Iterates the layers from bottom to top.
    pub fn iter(&self) -> Layers<'_> {
        Layers {
            stack: self,
            next: self.bottom,
        }
    }
}

/// Bottom-to-top iterator over a [`LayerStack`].
pub struct Layers<'a> {
    stack: &'a LayerStack,
    next: Option<LayerId>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = (LayerId, &'a Layer);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let layer = self.stack.get(id)?;
        self.next = layer.above;
        Some((id, layer))
    }
}
