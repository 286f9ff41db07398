use crate::physics::Physics;
use crate::traits::Scalar;

/// The shallow-water (St. Venant) equations: state `(h, hu, hv)`.
pub struct ShallowWater<T: Scalar> {
    pub gravity: T,
}

impl<T: Scalar> Default for ShallowWater<T> {
    fn default() -> Self {
        Self {
            gravity: T::from_f64(9.8).unwrap(),
        }
    }
}

impl<T: Scalar> Physics<T, 3> for ShallowWater<T> {
    fn flux_x(&self, u: &[T; 3]) -> [T; 3] {
        let half = T::from_f64(0.5).unwrap();
        let [h, hu, hv] = *u;
        [hu, hu * hu / h + half * self.gravity * h * h, hu * hv / h]
    }

    fn flux_y(&self, u: &[T; 3]) -> [T; 3] {
        let half = T::from_f64(0.5).unwrap();
        let [h, hu, hv] = *u;
        [hv, hu * hv / h, hv * hv / h + half * self.gravity * h * h]
    }

    fn wave_speed(&self, u: &[T; 3]) -> (T, T) {
        let [h, hu, hv] = *u;
        let root = (self.gravity * h).sqrt();
        ((hu / h).abs() + root, (hv / h).abs() + root)
    }
}
