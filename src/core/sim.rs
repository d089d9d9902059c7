use crate::config::SimConfig;
use crate::core::container::Container;
use crate::core::predict::{boundary_collision_time, pair_collision_time};
use crate::core::sampler::place_particles;
use crate::core::schedule::EventQueue;
use crate::core::vector;
use crate::core::{Event, EventKind, Particle};
use crate::error::{Error, Result};
use crate::output::{Frame, FrameSink};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Lifecycle of an engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineState {
    /// Events remain and the time budget is not exhausted.
    Running,
    /// The loop condition failed; the recorder has not been finished yet.
    Draining,
    /// The run is over and the recorder has been finished.
    Terminated,
}

/// Outcome of a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A valid event was dispatched.
    Resolved(EventKind),
    /// A superseded prediction was popped and dropped; time did not move.
    Stale,
    /// The queue is empty or the time budget is spent.
    Finished,
}

/// Counts of popped events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub valid_events: u64,
    pub stale_events: u64,
}

/// End-of-run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub particle_count: usize,
    pub final_time: f64,
    pub valid_events: u64,
    pub stale_events: u64,
    pub wall_pressure: f64,
    pub obstacle_pressure: f64,
    pub temperature: f64,
    pub kinetic_energy: f64,
    pub obstacle_first_hits: u64,
    pub obstacle_collisions: u64,
}

/// Event-driven hard-disk gas inside a circular container.
///
/// The particle arena is fixed for the whole run; events refer to particles by
/// index and carry collision-count snapshots, so stale predictions are dropped
/// when popped instead of being searched for and removed.
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    max_time: f64,
    container: Container,
    particles: Vec<Particle>,
    pq: EventQueue,
    state: EngineState,
    stats: EventStats,
    wall_impulse: f64,
    obstacle_impulse: f64,
    wall_pressure: f64,
    obstacle_pressure: f64,
    obstacle_hit: Vec<bool>,
    obstacle_first_hits: u64,
    obstacle_collisions: u64,
}

impl Simulation {
    /// Build a session from `config`, placing particles with a `StdRng` seeded
    /// from `config.seed` (or from the thread RNG when unset).
    pub fn new(config: &SimConfig) -> Result<Self> {
        let mut rng: StdRng = match config.seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build a session from `config`, drawing the initial placement from `rng`.
    ///
    /// Errors: `Error::InvalidParam` for a bad config, `Error::PlacementInfeasible`
    /// when the sampler cannot fit the particles.
    pub fn with_rng<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let container = config.container();
        let particles = place_particles(&container, &config.placement(), rng)?;
        Self::from_particles(container, particles, config.max_time)
    }

    /// Build a session from a ready-made particle set.
    ///
    /// Particle ids are reassigned to their index in `particles`.
    pub fn from_particles(
        container: Container,
        mut particles: Vec<Particle>,
        max_time: f64,
    ) -> Result<Self> {
        if particles.is_empty() {
            return Err(Error::InvalidParam("at least one particle is required".into()));
        }
        if particles.len() > u32::MAX as usize {
            return Err(Error::InvalidParam("too many particles".into()));
        }
        if !max_time.is_finite() || max_time <= 0.0 {
            return Err(Error::InvalidParam("max_time must be finite and > 0".into()));
        }
        for (k, p) in particles.iter_mut().enumerate() {
            p.id = k as u32;
            if !container.contains(&p.r, p.radius) {
                return Err(Error::InvalidParam(format!(
                    "particle {k} is not inside the container or overlaps the obstacle"
                )));
            }
        }
        for (k, p) in particles.iter().enumerate() {
            if particles[k + 1..].iter().any(|q| p.overlaps(q)) {
                return Err(Error::InvalidParam(format!("particle {k} overlaps another")));
            }
        }

        let n = particles.len();
        let mut sim = Self {
            time_now: 0.0,
            max_time,
            container,
            particles,
            pq: EventQueue::new(),
            state: EngineState::Running,
            stats: EventStats::default(),
            wall_impulse: 0.0,
            obstacle_impulse: 0.0,
            wall_pressure: 0.0,
            obstacle_pressure: 0.0,
            obstacle_hit: vec![false; n],
            obstacle_first_hits: 0,
            obstacle_collisions: 0,
        };
        sim.schedule_initial_events()?;
        Ok(sim)
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Queued events, including stale ones not yet popped.
    pub fn pending_events(&self) -> usize {
        self.pq.len()
    }

    /// Time of the earliest queued event, stale or not.
    pub fn next_event_time(&self) -> Option<f64> {
        self.pq.peek_time()
    }

    pub fn stats(&self) -> EventStats {
        self.stats
    }

    pub fn total_wall_impulse(&self) -> f64 {
        self.wall_impulse
    }

    pub fn total_obstacle_impulse(&self) -> f64 {
        self.obstacle_impulse
    }

    /// Cumulative wall impulse per unit wall length per unit time.
    pub fn wall_pressure(&self) -> f64 {
        self.wall_pressure
    }

    /// Cumulative obstacle impulse per unit obstacle length per unit time; zero without obstacle.
    pub fn obstacle_pressure(&self) -> f64 {
        self.obstacle_pressure
    }

    /// Distinct particles that have hit the obstacle at least once.
    pub fn obstacle_first_hits(&self) -> u64 {
        self.obstacle_first_hits
    }

    /// All particle-obstacle collisions so far.
    pub fn obstacle_collisions(&self) -> u64 {
        self.obstacle_collisions
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Mean kinetic energy per particle with `k_B = 1` (two degrees of freedom).
    pub fn temperature(&self) -> f64 {
        self.kinetic_energy() / self.particles.len() as f64
    }

    /// Borrowing snapshot of the current state.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            time: self.time_now,
            wall_pressure: self.wall_pressure,
            obstacle_pressure: self.obstacle_pressure,
            temperature: self.temperature(),
            obstacle_first_hits: self.obstacle_first_hits,
            obstacle_collisions: self.obstacle_collisions,
            particles: &self.particles,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            particle_count: self.particles.len(),
            final_time: self.time_now,
            valid_events: self.stats.valid_events,
            stale_events: self.stats.stale_events,
            wall_pressure: self.wall_pressure,
            obstacle_pressure: self.obstacle_pressure,
            temperature: self.temperature(),
            kinetic_energy: self.kinetic_energy(),
            obstacle_first_hits: self.obstacle_first_hits,
            obstacle_collisions: self.obstacle_collisions,
        }
    }

    /// Run the event loop to completion, recording one frame per valid event.
    pub fn run<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary> {
        info!(
            particles = self.particles.len(),
            max_time = self.max_time,
            obstacle = self.container.has_obstacle(),
            "starting run"
        );
        loop {
            match self.step()? {
                Step::Resolved(_) => sink.record(&self.frame())?,
                Step::Stale => {}
                Step::Finished => break,
            }
        }
        sink.finish()?;
        self.state = EngineState::Terminated;
        let summary = self.summary();
        info!(
            time = summary.final_time,
            valid = summary.valid_events,
            stale = summary.stale_events,
            wall_pressure = summary.wall_pressure,
            obstacle_pressure = summary.obstacle_pressure,
            "run finished"
        );
        Ok(summary)
    }

    /// One iteration of the event loop: pop, validate, advance, resolve, reschedule.
    pub fn step(&mut self) -> Result<Step> {
        if self.state != EngineState::Running {
            return Ok(Step::Finished);
        }
        if self.time_now >= self.max_time {
            self.state = EngineState::Draining;
            return Ok(Step::Finished);
        }
        let Some(ev) = self.pq.pop() else {
            self.state = EngineState::Draining;
            return Ok(Step::Finished);
        };

        if !self.is_current(&ev) {
            self.stats.stale_events += 1;
            trace!(kind = ?ev.kind, time = ev.time_f64(), "discarding stale event");
            return Ok(Step::Stale);
        }

        let t_ev = ev.time_f64();
        if t_ev > self.time_now {
            self.drift_all(t_ev - self.time_now);
            self.time_now = t_ev;
        }

        match ev.kind {
            EventKind::Wall { i } => self.resolve_wall(i as usize)?,
            EventKind::Obstacle { i } => self.resolve_obstacle(i as usize)?,
            EventKind::Pair { i, j } => self.resolve_pair(i as usize, j as usize)?,
        }
        self.update_pressures();
        self.stats.valid_events += 1;
        debug!(kind = ?ev.kind, time = self.time_now, "resolved event");

        self.reschedule_for_particle(ev.kind.first() as usize)?;
        if let Some(j) = ev.kind.second() {
            self.reschedule_for_particle(j as usize)?;
        }
        Ok(Step::Resolved(ev.kind))
    }

    // ============ Internal helpers ============

    fn is_current(&self, ev: &Event) -> bool {
        let cc_i = self.particles[ev.kind.first() as usize].collision_count;
        let cc_j = ev
            .kind
            .second()
            .map(|j| self.particles[j as usize].collision_count);
        ev.is_valid(cc_i, cc_j)
    }

    fn schedule_initial_events(&mut self) -> Result<()> {
        let n = self.particles.len();
        for i in 0..n {
            self.schedule_boundary_events(i)?;
            for j in (i + 1)..n {
                self.schedule_pair_event(i, j)?;
            }
        }
        Ok(())
    }

    fn reschedule_for_particle(&mut self, i: usize) -> Result<()> {
        self.schedule_boundary_events(i)?;
        for j in 0..self.particles.len() {
            if j == i {
                continue;
            }
            let (a, b) = if i < j { (i, j) } else { (j, i) };
            self.schedule_pair_event(a, b)?;
        }
        Ok(())
    }

    fn schedule_boundary_events(&mut self, i: usize) -> Result<()> {
        let p = &self.particles[i];
        let cc = p.collision_count;
        if let Some(dt) = boundary_collision_time(p, self.container.wall_contact_radius(p.radius)) {
            let ev = Event::new(self.time_now + dt, EventKind::Wall { i: p.id }, cc, None)?;
            self.pq.push(ev);
        }
        if let Some(contact) = self.container.obstacle_contact_radius(p.radius) {
            if let Some(dt) = boundary_collision_time(p, contact) {
                let ev = Event::new(self.time_now + dt, EventKind::Obstacle { i: p.id }, cc, None)?;
                self.pq.push(ev);
            }
        }
        Ok(())
    }

    fn schedule_pair_event(&mut self, i: usize, j: usize) -> Result<()> {
        let (pi, pj) = (&self.particles[i], &self.particles[j]);
        if let Some(dt) = pair_collision_time(pi, pj) {
            let ev = Event::new(
                self.time_now + dt,
                EventKind::Pair { i: pi.id, j: pj.id },
                pi.collision_count,
                Some(pj.collision_count),
            )?;
            self.pq.push(ev);
        }
        Ok(())
    }

    /// Move every particle along its straight line for `dt`.
    fn drift_all(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.advance(dt);
        }
    }

    /// Elastic collision along the line of centers.
    fn resolve_pair(&mut self, i: usize, j: usize) -> Result<()> {
        let (pi, pj) = (&self.particles[i], &self.particles[j]);
        let dr = vector::sub(&pj.r, &pi.r);
        let dv = vector::sub(&pj.v, &pi.v);
        let dvdr = vector::dot(&dr, &dv);
        let sigma = vector::norm(&dr);
        if sigma <= f64::EPSILON * (pi.radius + pj.radius) {
            warn!(i, j, "coincident centers at contact");
            return Err(Error::MathError(
                "degenerate contact normal in particle-particle collision".into(),
            ));
        }
        let (mi, mj) = (pi.mass, pj.mass);
        let impulse = 2.0 * mi * mj * dvdr / (sigma * (mi + mj));
        let jv = vector::scale(&dr, impulse / sigma);

        let vi = vector::add(&pi.v, &vector::scale(&jv, 1.0 / mi));
        let vj = vector::sub(&pj.v, &vector::scale(&jv, 1.0 / mj));
        self.particles[i].set_velocity(vi)?;
        self.particles[j].set_velocity(vj)?;
        self.particles[i].bump_collision_count();
        self.particles[j].bump_collision_count();
        Ok(())
    }

    fn resolve_wall(&mut self, i: usize) -> Result<()> {
        let impulse = reflect(&mut self.particles[i])?;
        self.wall_impulse += impulse;
        Ok(())
    }

    fn resolve_obstacle(&mut self, i: usize) -> Result<()> {
        if !self.container.has_obstacle() {
            return Ok(());
        }
        let impulse = reflect(&mut self.particles[i])?;
        self.obstacle_impulse += impulse;
        self.obstacle_collisions += 1;
        if !self.obstacle_hit[i] {
            self.obstacle_hit[i] = true;
            self.obstacle_first_hits += 1;
        }
        Ok(())
    }

    fn update_pressures(&mut self) {
        if self.time_now <= 0.0 {
            self.wall_pressure = 0.0;
            self.obstacle_pressure = 0.0;
            return;
        }
        self.wall_pressure = self.wall_impulse / (self.container.wall_perimeter() * self.time_now);
        self.obstacle_pressure = if self.container.has_obstacle() {
            self.obstacle_impulse / (self.container.obstacle_perimeter() * self.time_now)
        } else {
            0.0
        };
    }
}

/// Specular reflection about the radial normal through the origin. Returns the
/// impulse magnitude transferred to the boundary.
fn reflect(p: &mut Particle) -> Result<f64> {
    let Some(n) = vector::normalize(&p.r) else {
        warn!(id = p.id, "boundary contact at the origin");
        return Err(Error::MathError(
            "degenerate boundary normal at the origin".into(),
        ));
    };
    let vn = vector::dot(&p.v, &n);
    let v = vector::sub(&p.v, &vector::scale(&n, 2.0 * vn));
    p.set_velocity(v)?;
    p.bump_collision_count();
    Ok(2.0 * p.mass * vn.abs())
}
