use wfdispatch_config::WorkflowDefinition;

/// One step of selector matching.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
  pub name: &'static str,
  pub matches: fn(&str, &WorkflowDefinition) -> bool,
}

/// Matching rules in precedence order.
pub const MATCH_RULES: [MatchRule; 3] = [
  MatchRule {
    name: "id",
    matches: match_id,
  },
  MatchRule {
    name: "path",
    matches: match_path,
  },
  MatchRule {
    name: "name",
    matches: match_name,
  },
];

/// Exact numeric id.
fn match_id(selector: &str, workflow: &WorkflowDefinition) -> bool {
  selector.parse::<u64>().is_ok_and(|id| id == workflow.id)
}

/// Case-sensitive path, either the full repository path or its file name.
fn match_path(selector: &str, workflow: &WorkflowDefinition) -> bool {
  workflow.path == selector || workflow.file_name() == selector
}

/// Case-insensitive display name.
fn match_name(selector: &str, workflow: &WorkflowDefinition) -> bool {
  workflow.name.to_lowercase() == selector.to_lowercase()
}

/// Apply `rules` in order and return the first hit of the first rule that hits.
///
/// Weaker rules are never consulted once a stronger one matches, even when it
/// matches several candidates.
pub fn find_match<'a>(
  rules: &[MatchRule],
  selector: &str,
  candidates: &'a [WorkflowDefinition],
) -> Option<(&'static str, &'a WorkflowDefinition)> {
  rules.iter().find_map(|rule| {
    candidates
      .iter()
      .find(|w| (rule.matches)(selector, w))
      .map(|w| (rule.name, w))
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use wfdispatch_config::WorkflowState;

  fn wf(id: u64, name: &str, path: &str) -> WorkflowDefinition {
    WorkflowDefinition {
      id,
      name: name.to_string(),
      path: path.to_string(),
      state: WorkflowState::Active,
    }
  }

  #[test]
  fn test_id_rule() {
    let w = wf(42, "Deploy", ".github/workflows/deploy.yml");
    assert!(match_id("42", &w));
    assert!(!match_id("042x", &w));
    assert!(!match_id("Deploy", &w));
  }

  #[test]
  fn test_path_rule_is_case_sensitive() {
    let w = wf(1, "Deploy", ".github/workflows/deploy.yml");
    assert!(match_path(".github/workflows/deploy.yml", &w));
    assert!(match_path("deploy.yml", &w));
    assert!(!match_path("Deploy.yml", &w));
    assert!(!match_path("workflows/deploy.yml", &w));
  }

  #[test]
  fn test_name_rule_ignores_case() {
    let w = wf(1, "Deploy Prod", "deploy.yml");
    assert!(match_name("deploy prod", &w));
    assert!(match_name("DEPLOY PROD", &w));
    assert!(!match_name("deploy", &w));
  }

  #[test]
  fn test_id_beats_name() {
    // a workflow literally named "7" loses to the one whose id is 7
    let candidates = vec![wf(1, "7", "a.yml"), wf(7, "Seven", "b.yml")];
    let (rule, hit) = find_match(&MATCH_RULES, "7", &candidates).unwrap();
    assert_eq!(rule, "id");
    assert_eq!(hit.id, 7);
  }

  #[test]
  fn test_path_beats_name() {
    let candidates = vec![wf(1, "ci.yml", "x.yml"), wf(2, "Build", "ci.yml")];
    let (rule, hit) = find_match(&MATCH_RULES, "ci.yml", &candidates).unwrap();
    assert_eq!(rule, "path");
    assert_eq!(hit.id, 2);
  }

  #[test]
  fn test_ambiguous_name_takes_catalog_order() {
    let candidates = vec![wf(9, "Deploy", "one.yml"), wf(3, "deploy", "two.yml")];
    let (rule, hit) = find_match(&MATCH_RULES, "DEPLOY", &candidates).unwrap();
    assert_eq!(rule, "name");
    assert_eq!(hit.id, 9);
  }

  #[test]
  fn test_no_match() {
    let candidates = vec![wf(1, "Deploy", "deploy.yml")];
    assert!(find_match(&MATCH_RULES, "release", &candidates).is_none());
  }
}
