use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SimConfig;
use crate::core::particle::Particle;
use crate::core::vector::{Vec2, DIM};
use crate::core::{Simulation, Step};
use crate::output::NullSink;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_array(particles: &[Particle], pick: impl Fn(&Particle) -> Vec2) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((particles.len(), DIM));
    for (i, p) in particles.iter().enumerate() {
        let v = pick(p);
        for k in 0..DIM {
            arr[[i, k]] = v[k];
        }
    }
    arr
}

/// Python-facing wrapper around the Rust `Simulation`.
///
/// API:
/// - __new__(num_particles, speed, radius, max_time, obstacle=True, mass=1.0, seed=None)
/// - step() -> bool, run() -> int
/// - time, max_time, next_event_time, wall_pressure, obstacle_pressure, temperature
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct DiskGas {
    sim: Simulation,
}

#[pymethods]
impl DiskGas {
    /// Place particles and seed the event queue.
    ///
    /// Errors: raises ValueError on invalid parameters or infeasible placement.
    #[new]
    #[pyo3(signature = (num_particles, speed, radius, max_time, obstacle=true, mass=1.0, seed=None))]
    fn new(
        num_particles: usize,
        speed: f64,
        radius: f64,
        max_time: f64,
        obstacle: bool,
        mass: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = SimConfig {
            particle_count: num_particles,
            speed,
            radius,
            mass,
            max_time,
            obstacle,
            seed,
        };
        let sim = Simulation::new(&config).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Process one queued event. Returns False once the run is over.
    fn step(&mut self) -> PyResult<bool> {
        let step = self.sim.step().map_err(py_err)?;
        Ok(step != Step::Finished)
    }

    /// Run to the time budget (releases the GIL). Returns the number of valid events.
    fn run(&mut self, py: Python<'_>) -> PyResult<u64> {
        let summary = py
            .detach(|| self.sim.run(&mut NullSink))
            .map_err(py_err)?;
        Ok(summary.valid_events)
    }

    #[getter]
    fn time(&self) -> f64 {
        self.sim.time()
    }

    #[getter]
    fn max_time(&self) -> f64 {
        self.sim.max_time()
    }

    /// Time of the earliest queued event (possibly stale), or None when the queue is empty.
    #[getter]
    fn next_event_time(&self) -> Option<f64> {
        self.sim.next_event_time()
    }

    /// (wall impulse, obstacle impulse) accumulated so far.
    fn get_impulses(&self) -> (f64, f64) {
        (self.sim.total_wall_impulse(), self.sim.total_obstacle_impulse())
    }

    #[getter]
    fn wall_pressure(&self) -> f64 {
        self.sim.wall_pressure()
    }

    #[getter]
    fn obstacle_pressure(&self) -> f64 {
        self.sim.obstacle_pressure()
    }

    #[getter]
    fn temperature(&self) -> f64 {
        self.sim.temperature()
    }

    /// (first-time obstacle hits, total obstacle hits)
    fn get_obstacle_collisions(&self) -> (u64, u64) {
        (self.sim.obstacle_first_hits(), self.sim.obstacle_collisions())
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = to_array(self.sim.particles(), |p| p.r);
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = to_array(self.sim.particles(), |p| p.v);
        Ok(arr.into_pyarray(py).to_owned().into())
    }
}

/// The diskgas Python module entry point.
#[pymodule]
fn diskgas(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DiskGas>()?;
    Ok(())
}
