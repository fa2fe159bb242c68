//! Spatial transforms and the scoped transform stack.
//!
//! Drawing code composes object placement through a [`TransformStack`]:
//!
//! - [`Transform`]: position, rotation, and scale for one placement
//! - [`TransformStack`]: the owned stack of composed matrices
//! - [`TransformScope`]: an RAII guard that restores the stack when dropped
//!
//! # Scoped composition
//!
//! ```
//! use diorama::{Transform, TransformStack, Vec3};
//!
//! let mut stack = TransformStack::new();
//! {
//!     let mut house = stack.scope(Transform::from_position(Vec3::new(2.0, 0.0, 0.0)));
//!     let chimney = house.scope(Transform::from_position(Vec3::new(0.0, 3.0, 0.0)));
//!     assert_eq!(chimney.apply(Vec3::ZERO), Vec3::new(2.0, 3.0, 0.0));
//! }
//! // Both scopes are gone, the stack is back at the identity.
//! assert_eq!(stack.apply(Vec3::ONE), Vec3::ONE);
//! ```
//!
//! A scope is released on every exit path: normal return, early return,
//! `?` propagation, and panic unwinding all run its `Drop`.

use std::ops::{Deref, DerefMut};

use glam::{Mat4, Quat, Vec3};

use crate::error::SceneError;

/// A 3D transformation representing position, rotation, and scale.
///
/// Converted to a matrix in **Scale → Rotate → Translate** order.
///
/// ```
/// use diorama::{Transform, Vec3, Quat};
///
/// let wheel = Transform::new()
///     .position(Vec3::new(1.0, 0.2, -0.6))
///     .rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
///     .uniform_scale(0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Converts this transform to a 4×4 matrix (SRT order).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl From<Vec3> for Transform {
    fn from(position: Vec3) -> Self {
        Transform::from_position(position)
    }
}

/// Owned stack of composed transforms.
///
/// The bottom entry is the base transform and is never popped, so
/// [`current`](Self::current) is always defined. Entries owned by a live
/// [`TransformScope`] cannot be popped either.
#[derive(Clone, Debug)]
pub struct TransformStack {
    matrices: Vec<Mat4>,
    // lowest length `pop` may leave, one entry per live scope
    floors: Vec<usize>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::with_base(Mat4::IDENTITY)
    }
}

impl TransformStack {
    /// Creates a stack whose base transform is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack on top of an arbitrary base transform.
    pub fn with_base(base: Mat4) -> Self {
        Self {
            matrices: vec![base],
            floors: Vec::new(),
        }
    }

    /// The composed transform at the top of the stack.
    pub fn current(&self) -> Mat4 {
        // never empty: the base entry cannot be popped
        self.matrices[self.matrices.len() - 1]
    }

    /// Number of pushed entries above the base.
    pub fn depth(&self) -> usize {
        self.matrices.len() - 1
    }

    /// Maps a local point through the current transform.
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.current().transform_point3(point)
    }

    /// Pushes `current * transform`.
    ///
    /// Prefer [`scope`](Self::scope), which cannot leave the stack unbalanced.
    pub fn push(&mut self, transform: impl Into<Transform>) {
        let composed = self.current() * transform.into().matrix();
        self.matrices.push(composed);
    }

    /// Removes the top entry, restoring the transform that preceded it.
    ///
    /// Fails without touching the stack if the top entry is the base or
    /// belongs to an enclosing scope.
    pub fn pop(&mut self) -> Result<(), SceneError> {
        let floor = self.floors.last().copied().unwrap_or(1);
        if self.matrices.len() <= floor {
            return Err(SceneError::UnbalancedTransformScope);
        }
        self.matrices.pop();
        Ok(())
    }

    /// Enters a scope composed with `transform`.
    ///
    /// The returned guard derefs to the stack, so nested scopes and draws go
    /// through it. Dropping the guard truncates the stack back to the depth
    /// it had on entry, whatever happened inside.
    pub fn scope(&mut self, transform: impl Into<Transform>) -> TransformScope<'_> {
        let restore_len = self.matrices.len();
        self.push(transform);
        self.floors.push(self.matrices.len());
        TransformScope {
            stack: self,
            restore_len,
        }
    }

    /// Runs `f` inside a scope composed with `transform` and returns its result.
    pub fn with<R>(
        &mut self,
        transform: impl Into<Transform>,
        f: impl FnOnce(&mut TransformStack) -> R,
    ) -> R {
        let mut scope = self.scope(transform);
        f(&mut scope)
    }
}

/// Guard returned by [`TransformStack::scope`].
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
    restore_len: usize,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.stack.floors.pop();
        self.stack.matrices.truncate(self.restore_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn nested_scopes_restore_exact_matrix() {
        let base = Mat4::from_rotation_y(0.3) * Mat4::from_translation(Vec3::new(0.1, 0.2, 0.3));
        let mut stack = TransformStack::with_base(base);

        {
            let mut outer = stack.scope(Vec3::new(1.0, 2.0, 3.0));
            {
                let inner = outer.scope(Transform::new().uniform_scale(2.0));
                assert_eq!(inner.depth(), 2);
            }
            assert_eq!(outer.depth(), 1);
        }

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current().to_cols_array(), base.to_cols_array());
    }

    #[test]
    fn scopes_compose_translations() {
        let mut stack = TransformStack::new();
        let mut outer = stack.scope(Vec3::new(1.0, 0.0, 0.0));
        let inner = outer.scope(Vec3::new(0.0, 0.0, -2.0));
        assert_abs_diff_eq!(inner.apply(Vec3::ZERO), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn early_error_return_restores_stack() {
        fn draw_failing(stack: &mut TransformStack) -> Result<(), SceneError> {
            let mut scope = stack.scope(Vec3::X);
            scope.push(Vec3::Y);
            Err(SceneError::EmptyPolygon { polygon: 0 })
        }

        let mut stack = TransformStack::new();
        assert!(draw_failing(&mut stack).is_err());
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current(), Mat4::IDENTITY);
    }

    #[test]
    fn panic_inside_scope_restores_stack() {
        let mut stack = TransformStack::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _: () = stack.with(Vec3::new(5.0, 0.0, 0.0), |_| panic!("draw failed"));
        }));
        assert!(result.is_err());
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current(), Mat4::IDENTITY);
    }

    #[test]
    fn with_returns_closure_value() {
        let mut stack = TransformStack::new();
        let p = stack.with(Vec3::new(0.0, 4.0, 0.0), |s| s.apply(Vec3::ZERO));
        assert_eq!(p, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn pop_without_push_is_unbalanced() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.pop(), Err(SceneError::UnbalancedTransformScope));
        stack.push(Vec3::Z);
        assert_eq!(stack.pop(), Ok(()));
        assert_eq!(stack.pop(), Err(SceneError::UnbalancedTransformScope));
    }

    #[test]
    fn pop_cannot_reach_below_an_open_scope() {
        let mut stack = TransformStack::new();
        stack.push(Vec3::new(7.0, 0.0, 0.0));
        let entry = stack.current();
        {
            let mut scope = stack.scope(Vec3::Y);
            scope.push(Vec3::Z);
            assert_eq!(scope.pop(), Ok(()));
            assert_eq!(scope.pop(), Err(SceneError::UnbalancedTransformScope));
            assert_eq!(scope.pop(), Err(SceneError::UnbalancedTransformScope));
            assert_abs_diff_eq!(scope.apply(Vec3::ZERO), Vec3::new(7.0, 1.0, 0.0));
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current(), entry);
        assert_eq!(stack.pop(), Ok(()));
        assert_eq!(stack.current(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_applies_scale_before_translation() {
        let t = Transform::new()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .uniform_scale(2.0);
        assert_abs_diff_eq!(t.matrix().transform_point3(Vec3::X), Vec3::new(3.0, 0.0, 0.0));
    }
}
