use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::Engine;
use crate::error::SolverError;
use crate::grid::NGHOST;
use crate::physics::Physics;
use crate::traits::Scalar;

impl<T: Scalar, const W: usize, P: Physics<T, W>> Engine<T, W, P> {
    /// Writes the live interior as a binary PGM: header `P5\n<nx> <ny>
    /// 255\n`, then `nx * ny` bytes, rows from `iy = ny - 1` down to `0`,
    /// each row left to right. `pixel_fn` maps one state vector to an
    /// intensity, which is clamped to `[0, 255]`.
    pub fn write_pgm(
        &self,
        path: impl AsRef<Path>,
        pixel_fn: impl Fn(&[T; W]) -> i32,
    ) -> Result<(), SolverError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write!(writer, "P5\n{} {} 255\n", self.grid.nx, self.grid.ny)?;

        let mut bytes = Vec::with_capacity(self.grid.nx * self.grid.ny);
        for iy in (0..self.grid.ny).rev() {
            for ix in 0..self.grid.nx {
                let i = self.grid.idx(ix + NGHOST, iy + NGHOST);
                let value = pixel_fn(&self.grid.u[i]).clamp(0, 255);
                bytes.push(value as u8);
            }
        }
        writer.write_all(&bytes)?;
        Ok(())
    }
}
