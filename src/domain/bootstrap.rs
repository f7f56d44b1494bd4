use crate::domain::expr::Expr;

/// Reason string attached to the failure signal.
pub const INIT_FAILURE_MESSAGE: &str = "Failed to initialize";

/// Synthesizes the node's first-boot script as a Base64-wrapped join of
/// line expressions.
///
/// Control structure:
/// 1. make sure the bootstrap agent is available, installing it when the
///    probing invocation fails,
/// 2. run the init procedure bound to `instance_id`,
/// 3. branch on its exit status and emit exactly one signal to the handle:
///    exit code 1 with the fixed failure reason, or exit code 0.
///
/// The `if`/`else` guarantees one of the two signal lines runs per boot,
/// never both and never neither; the orchestrator's wait resource relies on
/// that.
pub fn user_data(instance_id: &str, handle_id: &str) -> Expr {
    Expr::base64(Expr::join(
        "\n",
        vec![
            Expr::str("#!/usr/bin/env bash"),
            Expr::str("export PATH=$PATH:/opt/aws/bin"),
            Expr::str("cfn-init -v || yum install aws-cfn-bootstrap -y"),
            Expr::Sub(format!(
                "cfn-init --region ${{AWS::Region}} --resource {} --stack ${{AWS::StackId}}",
                instance_id
            )),
            Expr::str("if [ $? -ne 0 ]; then"),
            Expr::Sub(format!(
                "cfn-signal -e 1 -r '{}' '${{{}}}'",
                INIT_FAILURE_MESSAGE, handle_id
            )),
            Expr::str("else"),
            Expr::Sub(format!("cfn-signal -e 0 '${{{}}}'", handle_id)),
            Expr::str("fi"),
            Expr::str("# EOF"),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_lines() -> Vec<Expr> {
        match user_data("ComputeNode", "ConditionHandle") {
            Expr::Base64(inner) => match *inner {
                Expr::Join { parts, .. } => parts,
                other => panic!("expected Join inside Base64, got {:?}", other),
            },
            other => panic!("expected Base64 user data, got {:?}", other),
        }
    }

    fn sub_text(expr: &Expr) -> Option<&str> {
        match expr {
            Expr::Sub(text) => Some(text),
            _ => None,
        }
    }

    #[test]
    fn test_script_references_the_handle() {
        let expr = user_data("ComputeNode", "ConditionHandle");
        let names = expr.referenced_names();
        assert_eq!(names, vec!["ConditionHandle", "ConditionHandle"]);
    }

    #[test]
    fn test_exactly_one_success_and_one_failure_signal() {
        let lines = script_lines();

        let failure_lines: Vec<_> = lines
            .iter()
            .filter_map(sub_text)
            .filter(|text| text.starts_with("cfn-signal -e 1"))
            .collect();
        let success_lines: Vec<_> = lines
            .iter()
            .filter_map(sub_text)
            .filter(|text| text.starts_with("cfn-signal -e 0"))
            .collect();

        assert_eq!(failure_lines.len(), 1);
        assert_eq!(success_lines.len(), 1);
        assert!(failure_lines[0].contains(INIT_FAILURE_MESSAGE));
    }

    #[test]
    fn test_signals_sit_on_opposite_branches() {
        let lines = script_lines();

        let position = |needle: &str| {
            lines
                .iter()
                .position(|line| match line {
                    Expr::Str(text) => text == needle,
                    Expr::Sub(text) => text.starts_with(needle),
                    _ => false,
                })
                .unwrap_or_else(|| panic!("line starting with '{}' not found", needle))
        };

        let if_line = position("if [ $? -ne 0 ]; then");
        let failure_line = position("cfn-signal -e 1");
        let else_line = position("else");
        let success_line = position("cfn-signal -e 0");
        let fi_line = position("fi");

        assert!(if_line < failure_line && failure_line < else_line);
        assert!(else_line < success_line && success_line < fi_line);
    }

    #[test]
    fn test_init_runs_against_the_given_resource() {
        let lines = script_lines();
        let init_line = lines
            .iter()
            .filter_map(sub_text)
            .find(|text| text.starts_with("cfn-init --region"))
            .unwrap();

        assert!(init_line.contains("--resource ComputeNode"));
        assert!(init_line.contains("${AWS::StackId}"));
    }
}
