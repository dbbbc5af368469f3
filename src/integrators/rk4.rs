use crate::physics::dynamics::EquationsOfMotion;

pub struct RK4<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> RK4<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    pub fn new(eom: T) -> Self {
        RK4 { eom }
    }

    pub fn integrate(&self, state: &T::State, dt: f64) -> T::State {
        let k1 = self.eom.compute_derivative(state);

        let state2 = state.clone() + k1.clone() * (dt / 2.0);
        let k2 = self.eom.compute_derivative(&state2);

        let state3 = state.clone() + k2.clone() * (dt / 2.0);
        let k3 = self.eom.compute_derivative(&state3);

        let state4 = state.clone() + k3.clone() * dt;
        let k4 = self.eom.compute_derivative(&state4);

        state.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Decay;

    #[derive(Clone)]
    struct Scalar(f64);

    impl std::ops::Add for Scalar {
        type Output = Scalar;
        fn add(self, other: Scalar) -> Scalar {
            Scalar(self.0 + other.0)
        }
    }

    impl std::ops::Mul<f64> for Scalar {
        type Output = Scalar;
        fn mul(self, k: f64) -> Scalar {
            Scalar(self.0 * k)
        }
    }

    impl EquationsOfMotion for Decay {
        type State = Scalar;
        fn compute_derivative(&self, state: &Scalar) -> Scalar {
            Scalar(-state.0)
        }
    }

    #[test]
    fn exponential_decay_matches_closed_form() {
        let rk4 = RK4::new(Decay);
        let mut x = Scalar(1.0);
        for _ in 0..100 {
            x = rk4.integrate(&x, 0.01);
        }
        assert_relative_eq!(x.0, (-1.0f64).exp(), epsilon = 1e-9);
    }
}
