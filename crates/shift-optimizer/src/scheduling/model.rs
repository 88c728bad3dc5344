//! Binary assignment model: one yes/no variable per (employee, shift) pair.
//!
//! Every pair gets a variable, including pairs that can never be chosen. Skill
//! and availability mismatches are expressed as constraints fixing the variable
//! to zero, so the model shape depends only on the input sizes and every rule is
//! visible as a named constraint.

use super::validation::ValidatedInput;

/// Absolute slack used when checking constraints and reading binary values.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Index of a decision variable inside [`DecisionModel::variables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(pub usize);

/// "Employee `employee` works shift `shift`", by position in the validated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionVariable {
    pub employee: usize,
    pub shift: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    ShiftExclusivity,
    SkillGate,
    AvailabilityGate,
    HourCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessOrEqual,
    Equal,
}

/// `Σ coefficient × variable  (≤ | =)  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub terms: Vec<(VariableId, f64)>,
    pub comparison: Comparison,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(variable, coefficient)| coefficient * values[variable.0])
            .sum()
    }

    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        let lhs = self.lhs(values);
        match self.comparison {
            Comparison::LessOrEqual => lhs <= self.rhs + INTEGRALITY_TOLERANCE,
            Comparison::Equal => (lhs - self.rhs).abs() <= INTEGRALITY_TOLERANCE,
        }
    }
}

/// Maximization problem over binary variables.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionModel {
    shift_count: usize,
    variables: Vec<DecisionVariable>,
    objective: Vec<(VariableId, f64)>,
    constraints: Vec<LinearConstraint>,
}

impl DecisionModel {
    /// Builds the model in employee-major order. Identical input yields an
    /// identical model.
    pub fn build(input: &ValidatedInput) -> Self {
        let shift_count = input.shifts.len();
        let variables: Vec<DecisionVariable> = (0..input.employees.len())
            .flat_map(|employee| (0..shift_count).map(move |shift| DecisionVariable { employee, shift }))
            .collect();

        let objective = (0..variables.len())
            .map(|index| (VariableId(index), 1.0))
            .collect();

        let mut model = Self {
            shift_count,
            variables,
            objective,
            constraints: Vec::new(),
        };

        model.add_shift_exclusivity(input);
        model.add_skill_gates(input);
        model.add_availability_gates(input);
        model.add_hour_caps(input);
        model
    }

    /// Variable for the given employee and shift positions.
    pub fn variable(&self, employee: usize, shift: usize) -> VariableId {
        VariableId(employee * self.shift_count + shift)
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn objective(&self) -> &[(VariableId, f64)] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraints_in(
        &self,
        family: ConstraintFamily,
    ) -> impl Iterator<Item = &LinearConstraint> + '_ {
        self.constraints
            .iter()
            .filter(move |constraint| constraint.family == family)
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|(variable, weight)| weight * values[variable.0])
            .sum()
    }

    /// Checks a candidate solution against every constraint and the binary domain.
    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        values.len() == self.variables.len()
            && values.iter().all(|value| {
                value.abs() <= INTEGRALITY_TOLERANCE
                    || (value - 1.0).abs() <= INTEGRALITY_TOLERANCE
            })
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied_by(values))
    }

    fn add_shift_exclusivity(&mut self, input: &ValidatedInput) {
        for (s, shift) in input.shifts.iter().enumerate() {
            let terms = (0..input.employees.len())
                .map(|e| (self.variable(e, s), 1.0))
                .collect();
            self.constraints.push(LinearConstraint {
                name: format!("Shift_{}_assigned", shift.id),
                family: ConstraintFamily::ShiftExclusivity,
                terms,
                comparison: Comparison::LessOrEqual,
                rhs: 1.0,
            });
        }
    }

    fn add_skill_gates(&mut self, input: &ValidatedInput) {
        for (e, employee) in input.employees.iter().enumerate() {
            for (s, shift) in input.shifts.iter().enumerate() {
                if !employee.has_skill(&shift.required_skill) {
                    self.fix_to_zero(
                        format!("Skill_{}_{}", employee.id, shift.id),
                        ConstraintFamily::SkillGate,
                        self.variable(e, s),
                    );
                }
            }
        }
    }

    fn add_availability_gates(&mut self, input: &ValidatedInput) {
        for (e, employee) in input.employees.iter().enumerate() {
            for (s, shift) in input.shifts.iter().enumerate() {
                if !employee.availability.contains(&shift.window) {
                    self.fix_to_zero(
                        format!("Avail_{}_{}", employee.id, shift.id),
                        ConstraintFamily::AvailabilityGate,
                        self.variable(e, s),
                    );
                }
            }
        }
    }

    fn add_hour_caps(&mut self, input: &ValidatedInput) {
        for (e, employee) in input.employees.iter().enumerate() {
            let terms = input
                .shifts
                .iter()
                .enumerate()
                .map(|(s, shift)| (self.variable(e, s), shift.duration_hours()))
                .collect();
            self.constraints.push(LinearConstraint {
                name: format!("MaxHours_{}", employee.id),
                family: ConstraintFamily::HourCap,
                terms,
                comparison: Comparison::LessOrEqual,
                rhs: employee.max_hours,
            });
        }
    }

    fn fix_to_zero(&mut self, name: String, family: ConstraintFamily, variable: VariableId) {
        self.constraints.push(LinearConstraint {
            name,
            family,
            terms: vec![(variable, 1.0)],
            comparison: Comparison::Equal,
            rhs: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::domain::{EmployeeRecord, ScheduleRequest, ShiftRecord};
    use crate::scheduling::validation::validate;

    fn input() -> ValidatedInput {
        let request = ScheduleRequest {
            period: "2025-07-01/2025-07-07".to_string(),
            employees: vec![
                EmployeeRecord {
                    id: "E1".to_string(),
                    name: "Ada".to_string(),
                    skills: vec!["barista".to_string()],
                    max_hours: 8.0,
                    availability_start: "2025-07-01T08:00:00".to_string(),
                    availability_end: "2025-07-01T16:00:00".to_string(),
                },
                EmployeeRecord {
                    id: "E2".to_string(),
                    name: "Brook".to_string(),
                    skills: vec!["cook".to_string(), "barista".to_string()],
                    max_hours: 6.0,
                    availability_start: "2025-07-01T12:00:00".to_string(),
                    availability_end: "2025-07-01T22:00:00".to_string(),
                },
            ],
            shifts: vec![
                ShiftRecord {
                    id: "S1".to_string(),
                    role: "front".to_string(),
                    start_time: "2025-07-01T09:00:00".to_string(),
                    end_time: "2025-07-01T13:00:00".to_string(),
                    required_skill: "barista".to_string(),
                },
                ShiftRecord {
                    id: "S2".to_string(),
                    role: "kitchen".to_string(),
                    start_time: "2025-07-01T14:00:00".to_string(),
                    end_time: "2025-07-01T20:00:00".to_string(),
                    required_skill: "cook".to_string(),
                },
                ShiftRecord {
                    id: "S3".to_string(),
                    role: "front".to_string(),
                    start_time: "2025-07-01T13:00:00".to_string(),
                    end_time: "2025-07-01T15:30:00".to_string(),
                    required_skill: "barista".to_string(),
                },
            ],
        };
        validate(&request).expect("valid input")
    }

    #[test]
    fn creates_one_variable_per_pair_including_infeasible_ones() {
        let model = DecisionModel::build(&input());
        assert_eq!(model.variables().len(), 6);
        assert_eq!(model.objective().len(), 6);
        assert!(model.objective().iter().all(|(_, weight)| *weight == 1.0));
        assert_eq!(
            model.variables()[model.variable(1, 2).0],
            DecisionVariable {
                employee: 1,
                shift: 2
            }
        );
    }

    #[test]
    fn emits_each_constraint_family() {
        let model = DecisionModel::build(&input());

        let exclusivity: Vec<_> = model
            .constraints_in(ConstraintFamily::ShiftExclusivity)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            exclusivity,
            vec!["Shift_S1_assigned", "Shift_S2_assigned", "Shift_S3_assigned"]
        );

        let skills: Vec<_> = model
            .constraints_in(ConstraintFamily::SkillGate)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(skills, vec!["Skill_E1_S2"]);

        let availability: Vec<_> = model
            .constraints_in(ConstraintFamily::AvailabilityGate)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(availability, vec!["Avail_E1_S2", "Avail_E2_S1"]);

        let caps: Vec<_> = model.constraints_in(ConstraintFamily::HourCap).collect();
        assert_eq!(caps.len(), 2);
        assert_eq!(caps[1].name, "MaxHours_E2");
        assert_eq!(caps[1].rhs, 6.0);
        let coefficients: Vec<f64> = caps[1].terms.iter().map(|(_, c)| *c).collect();
        assert_eq!(coefficients, vec![4.0, 6.0, 2.5]);
    }

    #[test]
    fn audits_candidate_solutions() {
        let model = DecisionModel::build(&input());
        let mut values = vec![0.0; 6];
        assert!(model.is_satisfied_by(&values));

        values[model.variable(0, 0).0] = 1.0;
        values[model.variable(1, 1).0] = 1.0;
        assert!(model.is_satisfied_by(&values));
        assert_eq!(model.objective_value(&values), 2.0);

        // E2 over their 6 hour cap.
        values[model.variable(1, 2).0] = 1.0;
        assert!(!model.is_satisfied_by(&values));
    }

    #[test]
    fn building_twice_yields_identical_models() {
        let input = input();
        assert_eq!(DecisionModel::build(&input), DecisionModel::build(&input));
    }
}
