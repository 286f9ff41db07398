use crate::traits::Scalar;

/// Generalized MinMod of two samples. Returns 0 when `a` and `b` disagree
/// in sign, otherwise the signed minimum magnitude.
///
/// Implemented via the `copysign` trick so that a zero argument behaves as
/// a positive sign (`copysign(0.5, +0) + copysign(0.5, -0) = 1` on
/// IEEE-754), matching the reference scheme exactly at the degenerate case.
pub fn minmod2<T: Scalar>(a: T, b: T) -> T {
    let half = T::from_f64(0.5).unwrap();
    (half.copysign(a) + half.copysign(b)) * a.abs().min(b.abs())
}

/// `xmic(dl, dr) = minmod2(theta * minmod2(dl, dr), (dl + dr) / 2)`
pub fn xmic<T: Scalar>(dl: T, dr: T, theta: T) -> T {
    let half = T::from_f64(0.5).unwrap();
    minmod2(theta * minmod2(dl, dr), half * (dl + dr))
}

/// Limited central difference of three samples, component-wise building
/// block for `ux`, `uy`, `fx`, `gy`.
pub fn limdiff<T: Scalar>(um: T, u0: T, up: T, theta: T) -> T {
    xmic(u0 - um, up - u0, theta)
}
