use tracing::trace;

use crate::core::metadata::ScoringInfo;
use crate::grading::calculators::{
    Calculator, ConsolidatedMolecularGradingCalculator, ExpressingAlleleGradingCalculator,
    ExpressingVsNullAlleleGradingCalculator, MultipleAlleleGradingCalculator,
    NewAlleleGradingCalculator, NullAlleleGradingCalculator, SerologyGradingCalculator,
};
use crate::grading::permissive::PermissiveMismatchCalculator;

/// Selects the calculator for a pair of typings from their categories
#[derive(Debug, Clone, Copy)]
pub struct GradingCalculatorFactory<'a> {
    permissive: &'a PermissiveMismatchCalculator,
}

impl<'a> GradingCalculatorFactory<'a> {
    pub fn new(permissive: &'a PermissiveMismatchCalculator) -> Self {
        Self { permissive }
    }

    /// Pick the calculator for a patient/donor pair.
    ///
    /// Categories are checked in priority order: new allele, serology, consolidated
    /// molecular, multiple allele, then single alleles by expression status.
    pub fn calculator_for(&self, patient: &ScoringInfo, donor: &ScoringInfo) -> Calculator<'a> {
        use ScoringInfo::{ConsolidatedMolecular, MultipleAllele, NewAllele, Serology, SingleAllele};

        let calculator = match (patient, donor) {
            (NewAllele(_), _) | (_, NewAllele(_)) => {
                Calculator::NewAllele(NewAlleleGradingCalculator)
            }
            (Serology(_), _) | (_, Serology(_)) => Calculator::Serology(SerologyGradingCalculator),
            (ConsolidatedMolecular(_), _) | (_, ConsolidatedMolecular(_)) => {
                Calculator::ConsolidatedMolecular(ConsolidatedMolecularGradingCalculator)
            }
            (MultipleAllele(_), _) | (_, MultipleAllele(_)) => {
                Calculator::MultipleAllele(MultipleAlleleGradingCalculator::new(self.permissive))
            }
            (SingleAllele(p), SingleAllele(d)) => match (p.is_null(), d.is_null()) {
                (false, false) => Calculator::ExpressingAllele(
                    ExpressingAlleleGradingCalculator::new(self.permissive),
                ),
                (true, true) => Calculator::NullAllele(NullAlleleGradingCalculator),
                _ => Calculator::ExpressingVsNullAllele(ExpressingVsNullAlleleGradingCalculator),
            },
        };

        trace!(
            "Selected {} calculator for {} vs {}",
            calculator.kind(),
            patient.category(),
            donor.category()
        );
        calculator
    }
}
