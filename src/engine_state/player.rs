//! # Player Module
//!
//! A first-person player walking on the voxel terrain. Movement is frame-rate
//! independent and collisions are point-sampled against the world's blocks:
//! the player has no width, only a feet sample and a head sample.
//!
//! ## Conventions
//! - `position` is the player's feet; the eye sits `PLAYER_HEIGHT` above it
//! - `yaw` is measured in degrees; `0` faces negative Z and `-90` faces negative X
//! - `pitch` is measured in degrees and clamped to `±MAX_PITCH`

use cgmath::{Deg, Matrix4, Point3, Vector3};
use log::warn;

use super::voxels::{block::is_air_id, world::World};

/// Distance from the feet to the eye, in blocks.
pub const PLAYER_HEIGHT: f32 = 1.8;
/// Downward acceleration in blocks per second squared.
pub const GRAVITY: f32 = 25.0;
/// Upward velocity applied by a jump, in blocks per second.
pub const JUMP_VELOCITY: f32 = 8.0;
/// Default horizontal speed in blocks per second.
pub const WALK_SPEED: f32 = 5.0;
/// Default degrees of rotation per unit of mouse movement.
pub const MOUSE_SENSITIVITY: f32 = 0.15;
/// Pitch limit in degrees.
pub const MAX_PITCH: f32 = 89.0;
/// Falling below this height respawns the player.
pub const VOID_HEIGHT: f32 = -10.0;
/// Height the player is put back at after falling into the void.
pub const RESPAWN_HEIGHT: f32 = 50.0;
/// Where a new player starts.
pub const SPAWN_POSITION: Point3<f32> = Point3::new(0.0, 20.0, 0.0);

/// Offset of the lower collision sample above the feet, and of the upper one below the head.
const COLLISION_MARGIN: f32 = 0.1;

/// Movement intents for one update, derived from input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAction {
    /// Walk along the view direction
    pub move_forward: bool,
    /// Walk against the view direction
    pub move_backward: bool,
    /// Strafe left
    pub move_left: bool,
    /// Strafe right
    pub move_right: bool,
    /// Jump if standing on a block
    pub jump: bool,
}

/// A first-person player with simple gravity and block collisions.
#[derive(Debug, Clone)]
pub struct Player {
    /// Position of the feet in world space
    pub position: Point3<f32>,
    /// Horizontal rotation in degrees
    pub yaw: f32,
    /// Vertical rotation in degrees
    pub pitch: f32,
    /// Walking speed in blocks per second
    pub walk_speed: f32,
    /// Degrees of rotation per unit of mouse movement
    pub sensitivity: f32,
    velocity_y: f32,
    grounded: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(SPAWN_POSITION)
    }
}

impl Player {
    /// Creates a player standing (or falling) at `position`, facing negative X.
    pub fn new(position: Point3<f32>) -> Self {
        Player {
            position,
            yaw: -90.0,
            pitch: 0.0,
            walk_speed: WALK_SPEED,
            sensitivity: MOUSE_SENSITIVITY,
            velocity_y: 0.0,
            grounded: false,
        }
    }

    /// Whether the player landed on a block during the last update.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Vertical velocity in blocks per second, positive upwards.
    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    /// The eye position the view is rendered from.
    pub fn eye_position(&self) -> Point3<f32> {
        self.position + Vector3::new(0.0, PLAYER_HEIGHT, 0.0)
    }

    /// Unit vectors (forward, right) in the horizontal plane for the current yaw.
    pub fn horizontal_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let yaw = self.yaw.to_radians();
        let (sin, cos) = yaw.sin_cos();
        (Vector3::new(sin, 0.0, -cos), Vector3::new(cos, 0.0, sin))
    }

    /// Advances the player by `dt` seconds.
    ///
    /// Horizontal movement is applied along X, then along Z, each step undone if it
    /// would put the feet or head sample inside a block. Vertical movement then
    /// lands the player on top of the block below or stops them under a ceiling.
    ///
    /// # Arguments
    /// * `world` - The world to collide against
    /// * `actions` - Movement intents for this update
    /// * `dt` - Elapsed time in seconds
    pub fn update(&mut self, world: &World, actions: &PlayerAction, dt: f32) {
        let (forward, right) = self.horizontal_axes();
        let step = self.walk_speed * dt;

        let mut movement = Vector3::new(0.0, 0.0, 0.0);
        if actions.move_forward {
            movement += forward * step;
        }
        if actions.move_backward {
            movement -= forward * step;
        }
        if actions.move_right {
            movement += right * step;
        }
        if actions.move_left {
            movement -= right * step;
        }

        if self.grounded && actions.jump {
            self.velocity_y = JUMP_VELOCITY;
            self.grounded = false;
        }
        self.velocity_y -= GRAVITY * dt;
        let move_y = self.velocity_y * dt;

        self.position.x += movement.x;
        if self.body_collides(world) {
            self.position.x -= movement.x;
        }

        self.position.z += movement.z;
        if self.body_collides(world) {
            self.position.z -= movement.z;
        }

        self.position.y += move_y;
        self.grounded = false;

        if move_y < 0.0 && is_solid(world, self.position) {
            self.position.y = self.position.y.ceil();
            self.velocity_y = 0.0;
            self.grounded = true;
        } else if move_y > 0.0 && is_solid(world, self.eye_position()) {
            self.position.y = (self.position.y + PLAYER_HEIGHT).floor() - PLAYER_HEIGHT;
            self.velocity_y = 0.0;
        }

        if self.position.y < VOID_HEIGHT {
            warn!("Player fell out of the world, respawning at y = {}", RESPAWN_HEIGHT);
            self.position.y = RESPAWN_HEIGHT;
            self.velocity_y = 0.0;
        }
    }

    /// Rotates the view by a mouse movement.
    pub fn handle_mouse_input(&mut self, dx: f64, dy: f64) {
        self.yaw += dx as f32 * self.sensitivity;
        self.pitch = (self.pitch + dy as f32 * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// The world-to-view transform for the current position and rotation.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = self.eye_position();
        Matrix4::from_angle_x(Deg(self.pitch))
            * Matrix4::from_angle_y(Deg(self.yaw))
            * Matrix4::from_translation(Vector3::new(-eye.x, -eye.y, -eye.z))
    }

    fn body_collides(&self, world: &World) -> bool {
        let feet = self.position + Vector3::new(0.0, COLLISION_MARGIN, 0.0);
        let head = self.position + Vector3::new(0.0, PLAYER_HEIGHT - COLLISION_MARGIN, 0.0);
        is_solid(world, feet) || is_solid(world, head)
    }
}

fn is_solid(world: &World, point: Point3<f32>) -> bool {
    !is_air_id(world.get_block_at(point.x, point.y, point.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::STONE,
        chunk::{Chunk, CHUNK_DIMENSION},
        terrain::TerrainGenerator,
    };
    use cgmath::{SquareMatrix, Transform};

    const DT: f32 = 1.0 / 60.0;

    /// A flat stone floor at y = 0 with a wall at x = 5 and a low ceiling over (2, 2).
    fn test_world() -> World {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                chunk.set_block(x, 0, z, STONE);
            }
        }
        for z in 0..CHUNK_DIMENSION {
            for y in 1..4 {
                chunk.set_block(5, y, z, STONE);
            }
        }
        chunk.set_block(2, 3, 2, STONE);

        let mut world = World::new(TerrainGenerator::default());
        world.insert_chunk(chunk);
        world
    }

    #[test]
    fn falls_onto_generated_terrain() {
        let mut world = World::new(TerrainGenerator::default());
        world.init_start_map();
        let mut player = Player::default();

        for _ in 0..300 {
            player.update(&world, &PlayerAction::default(), DT);
        }

        assert!(player.is_grounded());
        assert_eq!(player.position.y, world.get_ground_height(0.0, 0.0) as f32);
    }

    #[test]
    fn walls_block_horizontal_movement() {
        let world = test_world();
        let mut player = Player::new(Point3::new(2.5, 1.0, 8.5));
        player.yaw = 90.0;
        let forward = PlayerAction {
            move_forward: true,
            ..Default::default()
        };

        for _ in 0..120 {
            player.update(&world, &forward, DT);
        }

        assert!(player.position.x > 4.0 && player.position.x < 5.0);
        assert_eq!(player.position.y, 1.0);
        assert!((player.position.z - 8.5).abs() < 1e-4);
    }

    #[test]
    fn ceilings_stop_jumps() {
        let world = test_world();
        let mut player = Player::new(Point3::new(2.5, 1.0, 2.5));
        let jump = PlayerAction {
            jump: true,
            ..Default::default()
        };

        let mut highest = player.position.y;
        for _ in 0..60 {
            player.update(&world, &jump, DT);
            highest = highest.max(player.position.y);
        }

        assert!(highest <= 3.0 - PLAYER_HEIGHT + 1e-4);
        assert!(highest > 1.0);
    }

    #[test]
    fn open_sky_jump_returns_to_the_ground() {
        let world = test_world();
        let mut player = Player::new(Point3::new(8.5, 1.0, 8.5));
        player.update(&world, &PlayerAction::default(), DT);
        assert!(player.is_grounded());

        let jump = PlayerAction {
            jump: true,
            ..Default::default()
        };
        player.update(&world, &jump, DT);
        assert!(player.position.y > 1.0);

        for _ in 0..120 {
            player.update(&world, &PlayerAction::default(), DT);
        }
        assert_eq!(player.position.y, 1.0);
    }

    #[test]
    fn falling_into_the_void_respawns() {
        let world = World::new(TerrainGenerator::default());
        let mut player = Player::new(Point3::new(0.0, -9.999, 0.0));
        player.update(&world, &PlayerAction::default(), DT);

        assert_eq!(player.position.y, RESPAWN_HEIGHT);
        assert_eq!(player.velocity_y(), 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = Player::default();
        player.handle_mouse_input(10.0, 10_000.0);
        assert_eq!(player.pitch, MAX_PITCH);
        assert!((player.yaw - (-90.0 + 1.5)).abs() < 1e-4);

        player.handle_mouse_input(0.0, -20_000.0);
        assert_eq!(player.pitch, -MAX_PITCH);
    }

    #[test]
    fn view_matrix_maps_the_eye_to_the_origin() {
        let player = Player::new(Point3::new(3.0, 4.0, -2.0));
        let view = player.view_matrix();
        let eye = view.transform_point(player.eye_position());
        assert!(eye.x.abs() < 1e-5 && eye.y.abs() < 1e-5 && eye.z.abs() < 1e-5);
        assert!(view.invert().is_some());
    }
}
