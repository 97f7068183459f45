//! Terminal wireframe viewer built on `wire3d-core`
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wire3d_core::{
    animation::DEFAULT_INTERVAL,
    view::{fit_scale, frame_transform},
    Animation, Mesh, Orientation, Painter, Viewport,
};

pub mod renderer;

pub use renderer::CharCanvas;

/// Degrees turned per rotation key press.
const KEY_STEP: f64 = 5.0;

/// Longest wait for input while nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Viewer settings chosen on the command line.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Extra zoom on top of the automatic fit.
    pub scale: f64,
    pub animate: bool,
    pub refresh: Duration,
    /// Height-to-width ratio of a terminal cell.
    pub cell_aspect: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            animate: true,
            refresh: DEFAULT_INTERVAL,
            cell_aspect: 2.0,
        }
    }
}

/// A mesh, its orientation and the canvas it is painted on.
pub struct Viewer {
    mesh: Mesh,
    orientation: Orientation,
    painter: Painter,
    canvas: CharCanvas,
    viewport: Viewport,
    scale: f64,
}

impl Viewer {
    pub fn new(mut mesh: Mesh, config: &ViewerConfig, width: u16, height: u16) -> Self {
        if mesh.bounds().is_none() {
            mesh.find_boundary();
        }
        Self {
            mesh,
            orientation: Orientation::default(),
            painter: Painter::new(),
            canvas: CharCanvas::new(width as usize, height as usize),
            viewport: Viewport::new(width as f64, height as f64)
                .with_cell_aspect(config.cell_aspect),
            scale: config.scale,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn orientation_mut(&mut self) -> &mut Orientation {
        &mut self.orientation
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.width = width as f64;
        self.viewport.height = height as f64;
        self.canvas.resize(width as usize, height as usize);
    }

    /// Paint the current frame and return the canvas holding it.
    pub fn render(&mut self) -> &CharCanvas {
        self.canvas.clear();
        let Some(bounds) = self.mesh.bounds().copied() else {
            return &self.canvas;
        };

        let fit = fit_scale(&bounds, &self.viewport, self.scale);
        let transform = frame_transform(&bounds, &self.orientation, &self.viewport, fit);
        self.mesh.set_transformed(false);
        self.mesh.transform(&transform);
        self.painter.paint(&mut self.canvas, &self.mesh);
        &self.canvas
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    viewer: Viewer,
    animation: Animation,
    running: bool,
    needs_repaint: bool,
    drag_from: Option<(u16, u16)>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            viewer: Viewer::new(mesh, &config, width, height),
            animation: Animation::new(config.animate, config.refresh),
            running: true,
            needs_repaint: true,
            drag_from: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            if self.animation.due(Instant::now()) {
                let (dx, dy, dz) = self.animation.step();
                self.viewer.orientation_mut().spin(dx, dy, dz);
                self.needs_repaint = true;
            }

            if self.needs_repaint {
                self.needs_repaint = false;
                self.render()?;
            }

            let wait = self
                .animation
                .until_next(Instant::now())
                .map_or(IDLE_POLL, |until| until.min(IDLE_POLL));
            if event::poll(wait)? {
                self.handle_event(event::read()?);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.viewer.resize(width, height);
                self.needs_repaint = true;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        let (dx, dy, dz) = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char(' ') => {
                let enabled = self.animation.toggle();
                tracing::info!(enabled, "animation toggled");
                return;
            }
            KeyCode::Char('w') | KeyCode::Up => (KEY_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => (-KEY_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => (0.0, -KEY_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => (0.0, KEY_STEP, 0.0),
            KeyCode::Char('e') => (0.0, 0.0, KEY_STEP),
            KeyCode::Char('r') => (0.0, 0.0, -KEY_STEP),
            _ => return,
        };
        self.viewer.orientation_mut().spin(dx, dy, dz);
        self.needs_repaint = true;
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let here = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_from = Some(here),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(from) = self.drag_from.replace(here) {
                    let viewport = *self.viewer.viewport();
                    self.viewer.orientation_mut().drag(
                        (from.0 as f64, from.1 as f64),
                        (here.0 as f64, here.1 as f64),
                        &viewport,
                    );
                    self.needs_repaint = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.viewer.render().draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "wire3d | FPS: {:.1} | Arrows/WASD=Rotate E/R=Roll Space=Animate Drag=Rotate Q=Quit",
                self.fps
            )),
            ResetColor
        )?;
        stdout.flush()?;

        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_frame).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
            self.frame_count = 0;
            self.last_frame = now;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_cells(canvas: &CharCanvas) -> usize {
        canvas.to_text().chars().filter(|c| !c.is_whitespace()).count()
    }

    #[test]
    fn test_viewer_renders_cube() {
        let mut viewer = Viewer::new(Mesh::cube(2.0), &ViewerConfig::default(), 80, 40);
        let canvas = viewer.render();
        assert_eq!(canvas.width(), 80);
        assert_eq!(canvas.height(), 40);
        assert!(lit_cells(canvas) > 0);
        assert!(viewer.mesh().is_transformed());
    }

    #[test]
    fn test_rotation_changes_frame() {
        let mut viewer = Viewer::new(Mesh::cube(2.0), &ViewerConfig::default(), 60, 30);
        let before = viewer.render().to_text();
        viewer.orientation_mut().spin(30.0, 45.0, 0.0);
        let after = viewer.render().to_text();
        assert_ne!(before, after);
    }

    #[test]
    fn test_unbounded_mesh_gets_bounds() {
        let mut mesh = Mesh::new();
        mesh.load("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n".as_bytes())
            .unwrap();
        let mut viewer = Viewer::new(mesh, &ViewerConfig::default(), 40, 20);
        assert!(viewer.mesh().bounds().is_some());
        assert!(lit_cells(viewer.render()) > 0);
    }

    #[test]
    fn test_empty_mesh_renders_blank() {
        let mut viewer = Viewer::new(Mesh::new(), &ViewerConfig::default(), 10, 4);
        assert_eq!(lit_cells(viewer.render()), 0);
    }

    #[test]
    fn test_resize() {
        let mut viewer = Viewer::new(Mesh::cube(2.0), &ViewerConfig::default(), 10, 4);
        viewer.resize(20, 8);
        assert_eq!(viewer.viewport().width, 20.0);
        assert_eq!(viewer.render().height(), 8);
    }
}
