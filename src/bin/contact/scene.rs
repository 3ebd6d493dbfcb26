//! A toy physics loop: a crate dropped onto a floor, bouncing, then sliding
//! to rest, with a spray of gravel on every hard landing. Stands in for a
//! game's simulation thread.

use contact_noise::{
    contact::{burst::ImpactTrigger, ContactSender},
    dsp::NoiseSource,
};

const GRAVITY: f32 = 9.81;
const RESTITUTION: f32 = 0.45;
const SLIDING_FRICTION: f32 = 0.35;
const REST_SPEED: f32 = 0.4;
const PEBBLE_MASS: f32 = 0.05;
const PEBBLES_PER_LANDING: usize = 12;
/// Seconds at rest before the crate is lifted and dropped again.
const RELAUNCH_AFTER: f32 = 0.75;

pub struct Scene {
    rng: NoiseSource,
    mass: f32,
    height: f32,
    vertical: f32,
    horizontal: f32,
    on_floor: bool,
    resting_for: f32,
    landings: u64,
}

impl Scene {
    pub fn new(rng: NoiseSource) -> Self {
        let mut scene = Self {
            rng,
            mass: 2.0,
            height: 0.0,
            vertical: 0.0,
            horizontal: 0.0,
            on_floor: false,
            resting_for: 0.0,
            landings: 0,
        };
        scene.launch();
        scene
    }

    fn launch(&mut self) {
        self.height = self.rng.next_range(0.5, 2.0);
        self.vertical = 0.0;
        self.horizontal = self.rng.next_range(0.5, 3.0);
        self.on_floor = false;
        self.resting_for = 0.0;
        tracing::debug!(height = self.height, speed = self.horizontal, "crate dropped");
    }

    /// Advance by `dt` seconds and publish what happened.
    pub fn step(&mut self, dt: f32, contact: &ContactSender, gravel: &mut ImpactTrigger) {
        if !self.on_floor {
            self.vertical -= GRAVITY * dt;
            self.height += self.vertical * dt;

            if self.height <= 0.0 && self.vertical < 0.0 {
                let impact_speed = -self.vertical;
                contact.report_collision(self.mass, impact_speed);
                self.spray(impact_speed, gravel);
                self.landings += 1;

                self.height = 0.0;
                self.vertical = impact_speed * RESTITUTION;
                if self.vertical < REST_SPEED {
                    self.vertical = 0.0;
                    self.on_floor = true;
                }
            }
        }

        if self.on_floor {
            contact.report_contact();
            self.horizontal = (self.horizontal - SLIDING_FRICTION * GRAVITY * dt).max(0.0);
            if self.horizontal == 0.0 {
                self.resting_for += dt;
            }
        }
        contact.set_speed(self.horizontal);

        if self.resting_for >= RELAUNCH_AFTER {
            self.launch();
        }
    }

    fn spray(&mut self, impact_speed: f32, gravel: &mut ImpactTrigger) {
        for _ in 0..PEBBLES_PER_LANDING {
            let speed = impact_speed * self.rng.next_range(0.1, 0.6);
            let distance = self.rng.next_range(0.0, 3.0);
            gravel.collide(PEBBLE_MASS, speed, distance);
        }
    }

    pub fn landings(&self) -> u64 {
        self.landings
    }
}
