use serde::{Deserialize, Serialize};

/// A user group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

/// A page of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupList {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, alias = "data")]
    pub groups: Vec<Group>,
}

/// A member of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_list_accepts_data_alias() {
        let json = r#"{"has_more":true,"data":[{"id":"g1","name":"eng"}]}"#;
        let list: GroupList = serde_json::from_str(json).unwrap();
        assert!(list.has_more);
        assert_eq!(list.groups[0].id, "g1");
        assert!(list.groups[0].members.is_empty());
    }
}
