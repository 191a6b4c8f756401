//! A tiny retained widget tree recorded through [`Drawable`].

use tessel_engine::coords::{Rect, Vec2};
use tessel_engine::input::{MouseButton, PointerState};
use tessel_engine::mesh::{MeshHandle, MeshManager};
use tessel_engine::paint::Color;
use tessel_engine::scene::{DrawCommandBuffer, Drawable, ZIndex};

pub struct Panel {
    pub mesh: MeshHandle,
    pub rect: Rect,
    pub color: Color,
    pub z: ZIndex,
}

impl Drawable for Panel {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        buffer.push_nine_slice(self.z, self.mesh, self.rect, self.color);
    }
}

pub struct Label {
    pub mesh: MeshHandle,
    pub position: Vec2,
    pub color: Color,
    pub z: ZIndex,
}

impl Drawable for Label {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        buffer.push_text(self.z, self.mesh, self.position, self.color);
    }
}

pub struct Icon {
    pub mesh: MeshHandle,
    pub rect: Rect,
    pub color: Color,
}

impl Drawable for Icon {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        buffer.push_image(ZIndex::default(), self.mesh, self.rect, self.color);
    }
}

pub struct Button {
    pub frame: Panel,
    pub label: Option<Label>,
    pub hovered: bool,
    pub clicks: u32,
}

impl Button {
    const IDLE: Color = Color::from_premul(0.8, 0.8, 0.8, 1.0);
    const HOVER: Color = Color::WHITE;

    /// Updates hover state; true when a left click was released over it.
    pub fn update(&mut self, pointer: &PointerState) -> bool {
        self.hovered = pointer.position.is_some_and(|p| self.frame.rect.contains(p));
        self.frame.color = if self.hovered { Self::HOVER } else { Self::IDLE };
        let clicked = self.hovered && pointer.was_released(MouseButton::Left);
        if clicked {
            self.clicks += 1;
        }
        clicked
    }
}

impl Drawable for Button {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        self.frame.win_draw(buffer);
        if let Some(label) = &self.label {
            label.win_draw(buffer);
        }
    }
}

/// Framed container clipping its children to the content area.
pub struct Window {
    pub frame: Panel,
    pub title: Option<Label>,
    pub content: Rect,
    pub icons: Vec<Icon>,
    pub buttons: Vec<Button>,
    pub status: Option<Label>,
}

impl Window {
    pub fn hovered_button(&self) -> Option<Rect> {
        self.buttons.iter().find(|b| b.hovered).map(|b| b.frame.rect)
    }

    pub fn meshes(&self) -> Vec<MeshHandle> {
        let mut out = vec![self.frame.mesh];
        out.extend(self.title.iter().map(|l| l.mesh));
        out.extend(self.status.iter().map(|l| l.mesh));
        out.extend(self.icons.iter().map(|i| i.mesh));
        for b in &self.buttons {
            out.push(b.frame.mesh);
            out.extend(b.label.iter().map(|l| l.mesh));
        }
        out
    }

    pub fn destroy(self, meshes: &mut MeshManager) {
        for h in self.meshes() {
            meshes.destroy_mesh(h);
        }
    }
}

impl Drawable for Window {
    fn win_draw(&self, buffer: &mut DrawCommandBuffer) {
        self.frame.win_draw(buffer);
        if let Some(title) = &self.title {
            title.win_draw(buffer);
        }
        buffer.push_clip(self.content);
        // icons and buttons interleave in traversal order
        for (i, button) in self.buttons.iter().enumerate() {
            button.win_draw(buffer);
            if let Some(icon) = self.icons.get(i) {
                icon.win_draw(buffer);
            }
        }
        for icon in self.icons.iter().skip(self.buttons.len()) {
            icon.win_draw(buffer);
        }
        if let Some(status) = &self.status {
            status.win_draw(buffer);
        }
        buffer.pop_clip();
    }
}
