use std::path::PathBuf;

use curves_engine::device::GpuInit;
use curves_engine::input::{InputState, Key, MouseButton};
use curves_engine::window::{LogicalSize, RuntimeConfig};

use crate::controller::InputSource;
use crate::shaders::default_shader_dir;

/// Environment variable overriding the shader directory.
pub const SHADER_DIR_ENV: &str = "CURVES_SHADER_DIR";

/// A key or mouse button that triggers a signal while held.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Binding {
    Key(Key),
    Button(MouseButton),
}

impl Binding {
    fn held(self, state: &InputState) -> bool {
        match self {
            Binding::Key(k) => state.key_down(k),
            Binding::Button(b) => state.button_down(b),
        }
    }
}

/// Which inputs drive capture, clear and exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    pub capture: Binding,
    pub clear: Binding,
    pub exit: Binding,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            capture: Binding::Button(MouseButton::Left),
            clear: Binding::Key(Key::Delete),
            exit: Binding::Key(Key::Escape),
        }
    }
}

/// Demo configuration.
#[derive(Debug, Clone)]
pub struct CurvesConfig {
    pub window: RuntimeConfig,
    pub gpu: GpuInit,
    pub clear_color: wgpu::Color,
    pub bindings: Bindings,
    pub shader_dir: PathBuf,
}

impl Default for CurvesConfig {
    fn default() -> Self {
        Self {
            window: RuntimeConfig {
                title: "Curves".to_string(),
                initial_size: LogicalSize::new(1024.0, 600.0),
                resizable: true,
            },
            gpu: GpuInit {
                // Wireframe fill needs this; lines render identically without it.
                optional_features: wgpu::Features::POLYGON_MODE_LINE,
                depth_format: Some(wgpu::TextureFormat::Depth32Float),
                ..Default::default()
            },
            clear_color: wgpu::Color::BLACK,
            bindings: Bindings::default(),
            shader_dir: default_shader_dir(),
        }
    }
}

impl CurvesConfig {
    /// Defaults, with the shader directory taken from `CURVES_SHADER_DIR` if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(SHADER_DIR_ENV).filter(|d| !d.is_empty()) {
            config.shader_dir = PathBuf::from(dir);
        }
        config
    }
}

/// [`InputSource`] over the engine's held-input state.
pub struct BoundInput<'a> {
    pub state: &'a InputState,
    pub bindings: &'a Bindings,
}

impl InputSource for BoundInput<'_> {
    fn capture_active(&self) -> bool {
        self.bindings.capture.held(self.state)
    }

    fn clear_active(&self) -> bool {
        self.bindings.clear.held(self.state)
    }

    fn exit_active(&self) -> bool {
        self.bindings.exit.held(self.state)
    }

    fn pointer(&self) -> Option<(f32, f32)> {
        self.state.pointer_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curves_engine::input::{
        InputEvent, KeyState, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
    };

    #[test]
    fn defaults_match_demo() {
        let config = CurvesConfig::default();
        assert_eq!(config.window.title, "Curves");
        assert_eq!(config.window.initial_size, LogicalSize::new(1024.0, 600.0));
        assert_eq!(config.clear_color, wgpu::Color::BLACK);
        assert_eq!(config.bindings.exit, Binding::Key(Key::Escape));
        assert!(config.shader_dir.ends_with("shaders"));
    }

    #[test]
    fn bound_input_reads_held_state() {
        let bindings = Bindings::default();
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: Some((40.0, 50.0)),
        }));
        state.apply_event(&InputEvent::Key {
            key: Key::Delete,
            state: KeyState::Pressed,
            repeat: false,
        });

        let input = BoundInput { state: &state, bindings: &bindings };
        assert!(input.capture_active());
        assert!(input.clear_active());
        assert!(!input.exit_active());
        assert_eq!(input.pointer(), Some((40.0, 50.0)));
    }

    #[test]
    fn capture_stops_after_release_outside_window() {
        let bindings = Bindings::default();
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 10.0, y: 10.0 }));
        state.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: Some((10.0, 10.0)),
        }));
        state.apply_event(&InputEvent::PointerLeft);
        state.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            position: None,
        }));
        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 20.0, y: 20.0 }));

        let input = BoundInput { state: &state, bindings: &bindings };
        assert!(!input.capture_active());
        assert_eq!(input.pointer(), Some((20.0, 20.0)));
    }

    #[test]
    fn focus_loss_stops_capture() {
        let bindings = Bindings::default();
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: Some((1.0, 1.0)),
        }));
        state.apply_event(&InputEvent::Focused(false));

        let input = BoundInput { state: &state, bindings: &bindings };
        assert!(!input.capture_active());
    }

    #[test]
    fn rebinding_changes_signal_source() {
        let bindings = Bindings {
            capture: Binding::Key(Key::Space),
            ..Bindings::default()
        };
        let mut state = InputState::default();
        state.apply_event(&InputEvent::Key {
            key: Key::Space,
            state: KeyState::Pressed,
            repeat: false,
        });

        let input = BoundInput { state: &state, bindings: &bindings };
        assert!(input.capture_active());
    }
}
