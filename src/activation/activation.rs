/// Logistic sigmoid, `1 / (1 + e^-z)`.
///
/// Evaluated directly; very negative `z` overflows `exp` to infinity and the
/// result saturates to `0.0` rather than producing NaN.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Sigmoid derivative expressed through an already-activated value `a`:
/// `σ'(z) = a (1 - a)` where `a = σ(z)`.
pub fn sigmoid_prime_from_output(a: f64) -> f64 {
    a * (1.0 - a)
}
