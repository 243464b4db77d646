use tessera_core::inspect::{read_properties, write_property, Inspect, Property, PropertyValue, ValueKind};
use tessera_core::math::{Color, Vec2};
use tessera_core::surface::{DrawCmd, Surface};
use tessera_core::transform::Transform;
use tessera_core::CoreError;

use crate::component::{Component, Renderable};
use crate::render::QueueType;

/// A single line of text anchored at the owner's world position.
///
/// Labels go to the overlay queue unless told otherwise, so HUD text draws
/// over the world.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub offset: Vec2,
    pub z_offset: i32,
    pub visible: bool,
    pub queue: QueueType,
}

impl TextLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: 16.0,
            color: Color::WHITE,
            offset: Vec2::ZERO,
            z_offset: 0,
            visible: true,
            queue: QueueType::Overlay,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z_offset = z;
        self
    }

    pub fn in_queue(mut self, queue: QueueType) -> Self {
        self.queue = queue;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Renderable for TextLabel {
    fn draw(&self, surface: &mut dyn Surface, world: &Transform) {
        if self.text.is_empty() {
            return;
        }
        surface.submit(DrawCmd::Text {
            text: self.text.clone(),
            position: world.transform_point(self.offset),
            size: self.size * world.scale.y.abs(),
            color: self.color,
        });
    }

    fn z_offset(&self) -> i32 {
        self.z_offset
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn queue_type(&self) -> QueueType {
        self.queue
    }
}

impl Inspect for TextLabel {
    const PROPERTIES: &'static [Property<Self>] = &[
        Property {
            name: "text",
            kind: ValueKind::Text,
            get: |l| PropertyValue::Text(l.text.clone()),
            set: Some(|l, v| {
                if let PropertyValue::Text(t) = v {
                    l.text = t;
                }
            }),
        },
        Property {
            name: "size",
            kind: ValueKind::Float,
            get: |l| PropertyValue::Float(l.size.into()),
            set: Some(|l, v| {
                if let PropertyValue::Float(s) = v {
                    l.size = s as f32;
                }
            }),
        },
        Property {
            name: "color",
            kind: ValueKind::Color,
            get: |l| PropertyValue::Color(l.color),
            set: Some(|l, v| {
                if let PropertyValue::Color(c) = v {
                    l.color = c;
                }
            }),
        },
        Property {
            name: "visible",
            kind: ValueKind::Bool,
            get: |l| PropertyValue::Bool(l.visible),
            set: Some(|l, v| {
                if let PropertyValue::Bool(b) = v {
                    l.visible = b;
                }
            }),
        },
    ];
}

impl Component for TextLabel {
    fn type_name(&self) -> &'static str {
        "TextLabel"
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }

    fn inspect(&self) -> Vec<(&'static str, PropertyValue)> {
        read_properties(self)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), CoreError> {
        write_property(self, name, value)
    }
}
