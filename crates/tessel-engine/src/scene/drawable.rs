use super::buffer::DrawCommandBuffer;

/// Anything that records UI draw commands.
///
/// Widgets compose drawables rather than inheriting draw behavior; a
/// container's `win_draw` records its own chrome and then forwards to its
/// children in traversal order.
pub trait Drawable {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer);
}

impl<T: Drawable + ?Sized> Drawable for &T {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        (**self).win_draw(buffer);
    }
}

impl<T: Drawable + ?Sized> Drawable for Box<T> {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        (**self).win_draw(buffer);
    }
}

impl<T: Drawable> Drawable for [T] {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        for d in self {
            d.win_draw(buffer);
        }
    }
}

impl<T: Drawable> Drawable for Vec<T> {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        self.as_slice().win_draw(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::mesh::MeshHandle;
    use crate::paint::Color;
    use crate::scene::ZIndex;

    struct Tile(f32);

    impl Drawable for Tile {
        fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
            buffer.push_image(ZIndex(0), MeshHandle::INVALID, Rect::new(self.0, 0.0, 1.0, 1.0), Color::WHITE);
        }
    }

    struct Row(Vec<Box<dyn Drawable>>);

    impl Drawable for Row {
        fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
            buffer.push_clip(Rect::new(0.0, 0.0, 100.0, 1.0));
            self.0.win_draw(buffer);
            buffer.pop_clip();
        }
    }

    #[test]
    fn children_record_in_traversal_order_under_parent_clip() {
        let row = Row(vec![Box::new(Tile(0.0)), Box::new(Tile(1.0)), Box::new(Tile(2.0))]);
        let mut buf = DrawCommandBuffer::new();
        row.win_draw(&mut buf);
        assert_eq!(buf.len(), 3);
        assert!(buf.items().iter().all(|i| i.clip_rect.is_some()));
        assert_eq!(buf.indices_in_paint_order(), &[0, 1, 2]);
    }
}
