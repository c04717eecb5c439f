//! Levenberg-Marquardt wrapper for problems with a 2-D point as parameters.
use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{DVector, Dyn, OMatrix, Owned, Point2, U2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{Error, ResidualVector, Result};

/// Residual function of a 2-D point, as handed to the [`NonlinearFitter`].
pub trait ResidualFunction {
    /// Residuals at `candidate`.
    fn residuals(&self, candidate: &Point2<f64>) -> ResidualVector;

    /// Jacobian of [`ResidualFunction::residuals`] with respect to the candidate's
    /// coordinates, one row per residual.
    fn jacobian(&self, candidate: &Point2<f64>) -> OMatrix<f64, Dyn, U2>;
}

/// Termination settings of the Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Relative reduction of the sum of squares below which the fit is converged.
    pub ftol: f64,
    /// Relative change of the solution below which the fit is converged.
    pub xtol: f64,
    /// Orthogonality between residuals and Jacobian columns below which the fit is converged.
    pub gtol: f64,
    /// Factor for the initial trust region radius.
    pub stepbound: f64,
    /// The solver gives up after `patience * 3` residual evaluations.
    pub patience: usize,
    /// Rescale the parameters by the Jacobian column norms.
    pub scale_diag: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            ftol: 1e-15,
            xtol: 1e-12,
            gtol: 1e-15,
            stepbound: 100.0,
            patience: 200,
            scale_diag: true,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, tolerance) in [("ftol", self.ftol), ("xtol", self.xtol), ("gtol", self.gtol)] {
            if !(tolerance >= 0.0 && tolerance.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "`{name}` must be a finite, non-negative number, got {tolerance}"
                )));
            }
        }

        if !(self.stepbound > 0.0 && self.stepbound.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "`stepbound` must be positive, got {}",
                self.stepbound
            )));
        }

        if self.patience == 0 {
            return Err(Error::InvalidConfig("`patience` must be positive".into()));
        }

        Ok(())
    }
}

/// Minimizer found by the [`NonlinearFitter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub point: Point2<f64>,
    pub evaluations: usize,
}

/// Local minimizer of the sum of squared residuals of a [`ResidualFunction`].
#[derive(Debug, Clone, Default)]
pub struct NonlinearFitter {
    config: SolverConfig,
}

impl NonlinearFitter {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Search for a local minimizer of `function` starting at `initial`.
    ///
    /// Only the solver's success conditions (zero residuals, orthogonality, ftol or
    /// xtol convergence) produce a [`Minimum`], every other termination is reported
    /// as [`Error::FitDivergence`].
    pub fn minimize<F: ResidualFunction>(
        &self,
        function: &F,
        initial: Point2<f64>,
    ) -> Result<Minimum> {
        let problem = PointProblem {
            function,
            params: initial.coords,
        };

        let (problem, report) = LevenbergMarquardt::new()
            .with_ftol(self.config.ftol)
            .with_xtol(self.config.xtol)
            .with_gtol(self.config.gtol)
            .with_stepbound(self.config.stepbound)
            .with_patience(self.config.patience)
            .with_scale_diag(self.config.scale_diag)
            .minimize(problem);

        if !report.termination.was_successful() {
            return Err(Error::FitDivergence {
                reason: format!("{:?}", report.termination),
            });
        }

        tracing::trace!(
            termination = ?report.termination,
            evaluations = report.number_of_evaluations,
            "solver converged"
        );

        Ok(Minimum {
            point: Point2::from(problem.params),
            evaluations: report.number_of_evaluations,
        })
    }
}

struct PointProblem<'a, F> {
    function: &'a F,
    params: Vector2<f64>,
}

impl<F: ResidualFunction> LeastSquaresProblem<f64, Dyn, U2> for PointProblem<'_, F> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, U2>;
    type ParameterStorage = Owned<f64, U2>;

    fn set_params(&mut self, x: &Vector2<f64>) {
        self.params = *x;
    }

    fn params(&self) -> Vector2<f64> {
        self.params
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        let residuals = self.function.residuals(&Point2::from(self.params));
        residuals.iter().all(|r| r.is_finite()).then_some(residuals)
    }

    fn jacobian(&self) -> Option<OMatrix<f64, Dyn, U2>> {
        let jacobian = self.function.jacobian(&Point2::from(self.params));
        jacobian.iter().all(|v| v.is_finite()).then_some(jacobian)
    }
}
