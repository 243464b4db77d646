use tessera_core::inspect::{read_properties, write_property, Inspect, Property, PropertyValue, ValueKind};
use tessera_core::math::{Color, Vec2};
use tessera_core::surface::{DrawCmd, Surface};
use tessera_core::transform::Transform;
use tessera_core::CoreError;

use crate::component::{Component, Renderable};
use crate::render::QueueType;

/// Geometry drawn by a [`ShapeRenderer`], in the owner's local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { size: Vec2 },
    Circle { radius: f32 },
}

/// Draws a filled shape at the owner's world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRenderer {
    pub shape: Shape,
    pub color: Color,
    /// Local offset from the owner's origin.
    pub offset: Vec2,
    pub z_offset: i32,
    pub visible: bool,
    pub auto_queue: bool,
    pub queue: QueueType,
}

impl ShapeRenderer {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            offset: Vec2::ZERO,
            z_offset: 0,
            visible: true,
            auto_queue: true,
            queue: QueueType::Base,
        }
    }

    pub fn rect(size: Vec2, color: Color) -> Self {
        Self::new(Shape::Rect { size }, color)
    }

    pub fn circle(radius: f32, color: Color) -> Self {
        Self::new(Shape::Circle { radius }, color)
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z_offset = z;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn in_queue(mut self, queue: QueueType) -> Self {
        self.queue = queue;
        self
    }

    /// Only draw when explicitly enqueued.
    pub fn manual(mut self) -> Self {
        self.auto_queue = false;
        self
    }
}

impl Renderable for ShapeRenderer {
    fn draw(&self, surface: &mut dyn Surface, world: &Transform) {
        let center = world.transform_point(self.offset);
        let cmd = match self.shape {
            Shape::Rect { size } => DrawCmd::Rect {
                center,
                size: size.scale(world.scale),
                rotation: world.rotation,
                color: self.color,
            },
            Shape::Circle { radius } => DrawCmd::Circle {
                center,
                radius: radius * world.scale.x.abs().max(world.scale.y.abs()),
                color: self.color,
            },
        };
        surface.submit(cmd);
    }

    fn z_offset(&self) -> i32 {
        self.z_offset
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn auto_queue(&self) -> bool {
        self.auto_queue
    }

    fn queue_type(&self) -> QueueType {
        self.queue
    }
}

impl Inspect for ShapeRenderer {
    const PROPERTIES: &'static [Property<Self>] = &[
        Property {
            name: "color",
            kind: ValueKind::Color,
            get: |s| PropertyValue::Color(s.color),
            set: Some(|s, v| {
                if let PropertyValue::Color(c) = v {
                    s.color = c;
                }
            }),
        },
        Property {
            name: "offset",
            kind: ValueKind::Vec2,
            get: |s| PropertyValue::Vec2(s.offset),
            set: Some(|s, v| {
                if let PropertyValue::Vec2(o) = v {
                    s.offset = o;
                }
            }),
        },
        Property {
            name: "z_offset",
            kind: ValueKind::Int,
            get: |s| PropertyValue::Int(s.z_offset.into()),
            set: Some(|s, v| {
                if let PropertyValue::Int(z) = v {
                    s.z_offset = z.clamp(i32::MIN.into(), i32::MAX.into()) as i32;
                }
            }),
        },
        Property {
            name: "visible",
            kind: ValueKind::Bool,
            get: |s| PropertyValue::Bool(s.visible),
            set: Some(|s, v| {
                if let PropertyValue::Bool(b) = v {
                    s.visible = b;
                }
            }),
        },
        Property {
            name: "auto_queue",
            kind: ValueKind::Bool,
            get: |s| PropertyValue::Bool(s.auto_queue),
            set: Some(|s, v| {
                if let PropertyValue::Bool(b) = v {
                    s.auto_queue = b;
                }
            }),
        },
    ];
}

impl Component for ShapeRenderer {
    fn type_name(&self) -> &'static str {
        "ShapeRenderer"
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use tessera_core::surface::RecordingSurface;

    #[test]
    fn draws_at_world_transform() {
        let shape = ShapeRenderer::rect(Vec2::new(2.0, 4.0), Color::WHITE)
            .with_offset(Vec2::new(1.0, 0.0));
        let world = Transform::from_position(Vec2::new(10.0, 0.0))
            .with_rotation(FRAC_PI_2)
            .with_scale(Vec2::splat(2.0));
        let mut surface = RecordingSurface::new();
        shape.draw(&mut surface, &world);

        let cmds: Vec<_> = surface.draws().cloned().collect();
        match &cmds[..] {
            [DrawCmd::Rect { center, size, rotation, .. }] => {
                assert!(center.approx_eq(Vec2::new(10.0, 2.0), 1e-4));
                assert_eq!(*size, Vec2::new(4.0, 8.0));
                assert_eq!(*rotation, FRAC_PI_2);
            }
            other => panic!("unexpected draws: {other:?}"),
        }
    }

    #[test]
    fn circle_radius_follows_largest_scale_axis() {
        let shape = ShapeRenderer::circle(3.0, Color::BLACK);
        let world = Transform::IDENTITY.with_scale(Vec2::new(1.0, -2.0));
        let mut surface = RecordingSurface::new();
        shape.draw(&mut surface, &world);
        assert!(matches!(
            surface.draws().next(),
            Some(DrawCmd::Circle { radius, .. }) if *radius == 6.0
        ));
    }

    #[test]
    fn properties_round_trip_through_component_api() {
        let mut shape: Box<dyn Component> = Box::new(ShapeRenderer::circle(1.0, Color::WHITE));
        shape.set_property("z_offset", PropertyValue::Int(-3)).unwrap();
        let z = shape
            .inspect()
            .into_iter()
            .find(|(n, _)| *n == "z_offset")
            .map(|(_, v)| v);
        assert_eq!(z, Some(PropertyValue::Int(-3)));
        assert_eq!(shape.as_renderable().map(|r| r.z_offset()), Some(-3));
        assert!(shape.set_property("visible", PropertyValue::Int(0)).is_err());
    }
}
