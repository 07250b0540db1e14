//! 通用树形结构构建
//!
//! 部门树和菜单树共用的森林构建算法。扁平节点列表按 parent_id
//! 建立一次索引，再递归挂接子节点，同级按排序键升序。

use std::collections::HashMap;

use uuid::Uuid;

/// 可挂入森林的节点
pub trait TreeNode: Sized {
    /// 节点 ID
    fn node_id(&self) -> Uuid;

    /// 父节点 ID，None 表示根节点
    fn parent_node_id(&self) -> Option<Uuid>;

    /// 同级排序键
    fn sort_key(&self) -> i32;

    /// 挂接子节点。仅在子节点列表非空时被调用：
    /// 叶子节点不携带空的 children 集合。
    fn attach_children(&mut self, children: Vec<Self>);
}

/// 将扁平节点列表构建为森林
///
/// 父节点不在列表中的节点（根节点除外）不会出现在结果中。
/// 索引条目在消费时被移除，意外成环的数据也能终止。
pub fn build_forest<T: TreeNode>(nodes: Vec<T>) -> Vec<T> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<T>> = HashMap::new();
    for node in nodes {
        by_parent.entry(node.parent_node_id()).or_default().push(node);
    }

    attach_level(&mut by_parent, None)
}

fn attach_level<T: TreeNode>(
    by_parent: &mut HashMap<Option<Uuid>, Vec<T>>,
    parent: Option<Uuid>,
) -> Vec<T> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    level.sort_by_key(TreeNode::sort_key);

    for node in &mut level {
        let children = attach_level(by_parent, Some(node.node_id()));
        if !children.is_empty() {
            node.attach_children(children);
        }
    }

    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Item {
        id: Uuid,
        parent_id: Option<Uuid>,
        sort: i32,
        children: Option<Vec<Item>>,
    }

    impl Item {
        fn new(id: Uuid, parent_id: Option<Uuid>, sort: i32) -> Self {
            Self {
                id,
                parent_id,
                sort,
                children: None,
            }
        }
    }

    impl TreeNode for Item {
        fn node_id(&self) -> Uuid {
            self.id
        }

        fn parent_node_id(&self) -> Option<Uuid> {
            self.parent_id
        }

        fn sort_key(&self) -> i32 {
            self.sort
        }

        fn attach_children(&mut self, children: Vec<Self>) {
            self.children = Some(children);
        }
    }

    #[test]
    fn test_builds_nested_forest() {
        let root = Uuid::now_v7();
        let child_a = Uuid::now_v7();
        let child_b = Uuid::now_v7();
        let grandchild = Uuid::now_v7();

        let forest = build_forest(vec![
            Item::new(child_b, Some(root), 2),
            Item::new(root, None, 1),
            Item::new(grandchild, Some(child_a), 1),
            Item::new(child_a, Some(root), 1),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, root);

        let children = forest[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id, child_a);
        assert_eq!(children[1].id, child_b);
        assert_eq!(children[0].children.as_ref().unwrap()[0].id, grandchild);
    }

    #[test]
    fn test_leaf_carries_no_children_collection() {
        let root = Uuid::now_v7();
        let leaf = Uuid::now_v7();

        let forest = build_forest(vec![
            Item::new(root, None, 1),
            Item::new(leaf, Some(root), 1),
        ]);

        let children = forest[0].children.as_ref().unwrap();
        assert!(children[0].children.is_none());
    }

    #[test]
    fn test_sibling_order_follows_sort_key() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let c = Uuid::now_v7();

        let forest = build_forest(vec![
            Item::new(a, None, 30),
            Item::new(b, None, 10),
            Item::new(c, None, 20),
        ]);

        let order: Vec<Uuid> = forest.iter().map(|n| n.id).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn test_terminates_on_cyclic_parents() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        // a 和 b 互为父节点，均不可达，结果为空森林
        let forest = build_forest(vec![
            Item::new(a, Some(b), 1),
            Item::new(b, Some(a), 1),
        ]);

        assert!(forest.is_empty());
    }
}
