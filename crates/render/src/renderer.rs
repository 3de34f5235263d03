use crate::plan::{FramePlan, SceneObjectId};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a finished frame plan; it never sees the world
/// itself, so it cannot mutate game state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, plan: &FramePlan) -> Self::Output;
}

/// Text dump of a frame plan, one line per draw.
///
/// Used by the CLI `frame` command and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, plan: &FramePlan) -> String {
        self.frames += 1;
        let u = &plan.uniforms;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame (t={:.2}s, draws={}) ===\n",
            u.time,
            plan.draws.len()
        ));
        out.push_str(&format!(
            "Eye: ({:.1}, {:.1}, {:.1})\n",
            u.eye.x, u.eye.y, u.eye.z
        ));
        out.push_str(&format!(
            "Spotlight: {} dir=({:.2}, {:.2}, {:.2})\n",
            if u.spotlight.enabled { "on" } else { "off" },
            u.spotlight.direction.x,
            u.spotlight.direction.y,
            u.spotlight.direction.z
        ));
        out.push_str(&format!("Lanterns: {}\n", u.lanterns.len()));

        for draw in &plan.draws {
            let p = draw.model.w_axis;
            let mut flags = Vec::new();
            if draw.flags.instanced {
                flags.push("instanced");
            }
            if draw.flags.cloud {
                flags.push("cloud");
            }
            if draw.flags.textured {
                flags.push("textured");
            }
            if draw.flags.normal_mapped {
                flags.push("normal-mapped");
            }
            out.push_str(&format!(
                "  {:<15} pos=({:.1}, {:.1}, {:.1}) color=({:.2}, {:.2}, {:.2}) x{} [{}]\n",
                draw.object.name(),
                p.x,
                p.y,
                p.z,
                draw.color.x,
                draw.color.y,
                draw.color.z,
                draw.instances,
                flags.join(",")
            ));
        }

        if plan.count(SceneObjectId::Airship) == 0 {
            out.push_str("  (airship hidden in aim mode)\n");
        }
        out
    }
}
