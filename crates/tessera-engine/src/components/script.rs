use crate::component::{Component, Update, UpdateCtx};

/// Boxed hook used by [`Script`].
pub type ScriptFn = Box<dyn FnMut(&mut UpdateCtx<'_>)>;

/// A component whose start and update hooks are closures.
///
/// ```
/// use tessera_engine::prelude::*;
///
/// let mut project = Project::new("demo");
/// let scene = project.create_scene_and_load("main").unwrap();
/// let mover = scene.create_object("mover");
/// scene
///     .add_component(mover, Script::new(|ctx| {
///         let owner = ctx.owner();
///         if let Some(go) = ctx.scene_mut().get_mut(owner) {
///             go.transform_mut().position.x += 1.0;
///         }
///     }))
///     .unwrap();
///
/// let engine = EngineContext::headless();
/// project.update(&engine);
/// project.update(&engine);
/// let x = project.active_scene().unwrap().get(mover).unwrap().local_position().x;
/// assert_eq!(x, 2.0);
/// ```
pub struct Script {
    label: &'static str,
    on_start: Option<ScriptFn>,
    on_update: Option<ScriptFn>,
}

impl Script {
    /// A script that runs `update` every frame.
    pub fn new(update: impl FnMut(&mut UpdateCtx<'_>) + 'static) -> Self {
        Self {
            label: "script",
            on_start: None,
            on_update: Some(Box::new(update)),
        }
    }

    /// A script with only a start hook.
    pub fn on_start(start: impl FnMut(&mut UpdateCtx<'_>) + 'static) -> Self {
        Self {
            label: "script",
            on_start: Some(Box::new(start)),
            on_update: None,
        }
    }

    pub fn with_start(mut self, start: impl FnMut(&mut UpdateCtx<'_>) + 'static) -> Self {
        self.on_start = Some(Box::new(start));
        self
    }

    /// Name shown in scene outlines instead of the type name.
    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl Component for Script {
    fn type_name(&self) -> &'static str {
        self.label
    }

    fn start(&mut self, ctx: &mut UpdateCtx<'_>) {
        if let Some(f) = self.on_start.as_mut() {
            f(ctx);
        }
    }

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        if self.on_update.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl Update for Script {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        if let Some(f) = self.on_update.as_mut() {
            f(ctx);
        }
    }
}
