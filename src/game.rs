//! Ball simulation and frame-level game state.
//!
//! Balls are integer-positioned disks that reflect off the window edges;
//! the state owns them together with the finished flag and the simulation
//! timing bookkeeping. The pixel buffer is not stored here - it is created
//! per frame over the display surface and passed in to draw.

use crate::config::Config;
use crate::display::{Pixel, PixelBuffer};
use crate::util::Rng;

/// Every ball gets the same contrasting outline.
const OUTLINE_COLOR: Pixel = 0xFFFF_FFFF;

/// A bouncing ball: radius, position, velocity, opaque fill color.
#[derive(Debug, Clone)]
pub struct Ball {
    pub r: i32,
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub color: Pixel,
}

impl Ball {
    /// Roll a ball whose whole disk fits inside the drawable area, with
    /// velocity components in [-max_speed, max_speed] and a fill color
    /// from the palette.
    pub fn random(rng: &mut Rng, config: &Config, width: i32, height: i32) -> Self {
        let r = rng.range_i32(config.min_radius, config.max_radius);
        let x = rng.range_i32(r, width - r - 1);
        let y = rng.range_i32(r, height - r - 1);
        let dx = rng.range_i32(-config.max_speed, config.max_speed);
        let dy = rng.range_i32(-config.max_speed, config.max_speed);
        let idx = rng.range_i32(0, config.palette.len() as i32 - 1) as usize;
        // The fill is always fully opaque, whatever the palette entry says.
        let color = config.palette[idx] | 0xff;

        Self {
            r,
            x,
            y,
            dx,
            dy,
            color,
        }
    }

    /// One simulation step: flip the velocity sign at a wall, then move.
    ///
    /// There is no positional correction - a ball can sit past a wall by up
    /// to one step's velocity until the flipped velocity carries it back.
    pub fn advance(&mut self, bounds_width: i32, bounds_height: i32) {
        if self.x + self.r >= bounds_width || self.x - self.r < 0 {
            self.dx = -self.dx;
        }
        if self.y + self.r >= bounds_height || self.y - self.r < 0 {
            self.dy = -self.dy;
        }
        self.x += self.dx;
        self.y += self.dy;
    }

    /// Filled disk plus the contrasting outline.
    pub fn draw(&self, buffer: &mut PixelBuffer) {
        buffer.fill_circle(self.color, self.x, self.y, self.r);
        buffer.draw_circle(OUTLINE_COLOR, self.x, self.y, self.r);
    }
}

/// Per-run state threaded through the frame loop by parameter.
pub struct GameState {
    balls: Vec<Ball>,
    finished: bool,
    last_advance_ms: u64,
    frame_count: u32,
    frame_interval_ms: u64,
    max_steps: Option<u32>,
    checker_size: i32,
    background: [Pixel; 2],
    width: i32,
    height: i32,
}

impl GameState {
    pub fn new(config: &Config, rng: &mut Rng, width: u32, height: u32) -> Self {
        let w = width as i32;
        let h = height as i32;
        let balls = (0..config.num_balls)
            .map(|_| Ball::random(rng, config, w, h))
            .collect();

        Self {
            balls,
            finished: false,
            last_advance_ms: 0,
            frame_count: 0,
            frame_interval_ms: config.frame_interval_ms,
            max_steps: config.max_steps,
            checker_size: config.checker_size,
            background: config.background,
            width: w,
            height: h,
        }
    }

    /// Flip the finished flag and return its new value. While finished the
    /// simulation holds still but frames keep redrawing.
    pub fn toggle_finished(&mut self) -> bool {
        self.finished = !self.finished;
        self.finished
    }

    /// Simulation steps taken so far.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Draw one frame: checkerboard backdrop, then every ball in order.
    pub fn draw(&self, buffer: &mut PixelBuffer) {
        self.draw_background(buffer);
        for ball in &self.balls {
            ball.draw(buffer);
        }
    }

    /// Checkerboard: cells whose x/y cell parities agree get the first
    /// background color. Edge cells clip against the buffer bounds.
    fn draw_background(&self, buffer: &mut PixelBuffer) {
        let w = buffer.width() as i32;
        let h = buffer.height() as i32;
        let size = self.checker_size;

        let mut row = 0;
        let mut y = 0;
        while y < h {
            let mut col = 0;
            let mut x = 0;
            while x < w {
                let color = if (row & 1) == (col & 1) {
                    self.background[0]
                } else {
                    self.background[1]
                };
                buffer.fill_rect_opaque(color, x, y, x + size, y + size);
                col += 1;
                x += size;
            }
            row += 1;
            y += size;
        }
    }

    /// Advance the simulation when due. Returns true if a step was taken:
    /// only when not finished, the frame interval has elapsed since the
    /// last step, and the optional step cap has not been reached.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }
        if now_ms.saturating_sub(self.last_advance_ms) < self.frame_interval_ms {
            return false;
        }
        if let Some(max) = self.max_steps {
            if self.frame_count >= max {
                return false;
            }
        }

        for ball in &mut self.balls {
            ball.advance(self.width, self.height);
        }
        self.frame_count += 1;
        self.last_advance_ms = now_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::rgba;

    fn test_config(num_balls: usize) -> Config {
        Config {
            num_balls,
            ..Config::default()
        }
    }

    #[test]
    fn test_reflect_at_left_wall() {
        let mut ball = Ball {
            r: 25,
            x: 10,
            y: 300,
            dx: -3,
            dy: 0,
            color: 0xFF0000FF,
        };
        // x - r < 0, so dx flips before the move.
        ball.advance(800, 600);
        assert_eq!(ball.dx, 3);
        assert_eq!(ball.x, 13);
        assert_eq!(ball.y, 300);
    }

    #[test]
    fn test_reflect_at_right_and_bottom_walls() {
        let mut ball = Ball {
            r: 25,
            x: 776,
            y: 576,
            dx: 4,
            dy: 2,
            color: 0xFF0000FF,
        };
        // x + r >= 800 and y + r >= 600: both components flip.
        ball.advance(800, 600);
        assert_eq!((ball.dx, ball.dy), (-4, -2));
        assert_eq!((ball.x, ball.y), (772, 574));
    }

    #[test]
    fn test_advance_moves_by_velocity_in_open_space() {
        let mut ball = Ball {
            r: 25,
            x: 400,
            y: 300,
            dx: 3,
            dy: -2,
            color: 0xFF0000FF,
        };
        ball.advance(800, 600);
        assert_eq!((ball.x, ball.y), (403, 298));
        assert_eq!((ball.dx, ball.dy), (3, -2));
    }

    #[test]
    fn test_random_balls_fit_inside_bounds() {
        let config = Config::default();
        for seed in 1..=50 {
            let mut rng = Rng::new(seed);
            let ball = Ball::random(&mut rng, &config, 800, 600);
            assert!(ball.r >= config.min_radius && ball.r <= config.max_radius);
            assert!(ball.x - ball.r >= 0 && ball.x + ball.r < 800);
            assert!(ball.y - ball.r >= 0 && ball.y + ball.r < 600);
            assert!(ball.dx.abs() <= config.max_speed);
            assert!(ball.dy.abs() <= config.max_speed);
            assert_eq!(ball.color & 0xff, 0xff, "fill must be opaque");
        }
    }

    #[test]
    fn test_ball_draw_stays_within_disk() {
        let ball = Ball {
            r: 10,
            x: 20,
            y: 20,
            dx: 0,
            dy: 0,
            color: rgba(200, 30, 30, 255),
        };
        let mut buffer = PixelBuffer::owned(41, 41).unwrap();
        ball.draw(&mut buffer);

        assert_eq!(buffer.get(20, 20), Some(ball.color));
        // Rightmost outline point sits on the boundary in white.
        assert_eq!(buffer.get(30, 20), Some(0xFFFF_FFFF));
        for y in 0..41 {
            for x in 0..41 {
                if buffer.get(x, y) != Some(0) {
                    let dx = (x - 20) as f64;
                    let dy = (y - 20) as f64;
                    assert!(dx.hypot(dy) <= 11.0, "pixel ({x},{y}) outside disk");
                }
            }
        }
    }

    #[test]
    fn test_advance_gated_by_frame_interval() {
        let mut rng = Rng::new(7);
        let mut state = GameState::new(&test_config(1), &mut rng, 800, 600);

        assert!(!state.advance(0));
        assert!(!state.advance(24));
        assert!(state.advance(25));
        assert!(!state.advance(30));
        assert!(state.advance(50));
        assert_eq!(state.frame_count(), 2);
    }

    #[test]
    fn test_finished_pauses_simulation() {
        let mut rng = Rng::new(7);
        let mut state = GameState::new(&test_config(1), &mut rng, 800, 600);

        assert!(state.toggle_finished());
        assert!(!state.advance(1000));
        assert!(!state.toggle_finished());
        assert!(state.advance(1000));
    }

    #[test]
    fn test_max_steps_caps_simulation() {
        let mut config = test_config(1);
        config.max_steps = Some(2);
        let mut rng = Rng::new(7);
        let mut state = GameState::new(&config, &mut rng, 800, 600);

        assert!(state.advance(25));
        assert!(state.advance(50));
        assert!(!state.advance(75));
        assert_eq!(state.frame_count(), 2);
    }

    #[test]
    fn test_background_checker_parity() {
        let mut config = test_config(0);
        config.checker_size = 4;
        let mut rng = Rng::new(7);
        let state = GameState::new(&config, &mut rng, 16, 8);

        let mut buffer = PixelBuffer::owned(16, 8).unwrap();
        state.draw(&mut buffer);

        let [even, odd] = config.background;
        assert_eq!(buffer.get(0, 0), Some(even));
        assert_eq!(buffer.get(4, 0), Some(odd));
        assert_eq!(buffer.get(0, 4), Some(odd));
        assert_eq!(buffer.get(4, 4), Some(even));
        assert_eq!(buffer.get(15, 7), Some(even));
        assert_eq!(buffer.get(15, 3), Some(odd));
    }
}
