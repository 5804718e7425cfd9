//! Recursive construction of the scene graph from group objects

use serde_json::Value;

use super::entities::{self, AssetPaths};
use super::schema::{self, Fields, GROUP, MASTER, OBJECT_TYPES};
use super::values::{self, field_at, index_at, JsonObject};
use crate::error::{Result, SceneError};
use crate::foundation::collections::NodeHandle;
use crate::scene::{LightData, Primitive, SceneGraph, SceneNode};

/// Name of the group that becomes the scene root
pub const ROOT_GROUP: &str = "root";

/// Output of a completed build
#[derive(Debug)]
pub struct BuiltGraph {
    /// All nodes plus the name registry
    pub graph: SceneGraph,
    /// Lights in depth-first document order
    pub lights: Vec<LightData>,
    /// Handle of the `root` group
    pub root: NodeHandle,
}

/// Depth-first builder over a scene's groups
///
/// Groups are registered as soon as they are entered; the handles of groups
/// whose bodies are still being built are kept on a stack so a master
/// reference back into them is rejected.
pub struct GraphBuilder {
    graph: SceneGraph,
    lights: Vec<LightData>,
    assets: AssetPaths,
    max_depth: usize,
    building: Vec<NodeHandle>,
}

impl GraphBuilder {
    /// Create a builder resolving assets against `assets`
    pub fn new(assets: AssetPaths, max_depth: usize) -> Self {
        Self {
            graph: SceneGraph::new(),
            lights: Vec::new(),
            assets,
            max_depth,
            building: Vec::new(),
        }
    }

    /// Build a top-level (or template) group registered under `key`
    pub fn add_group(&mut self, key: &str, value: &Value, at: &str) -> Result<NodeHandle> {
        let handle = self.parse_group(value, Some(key), 0, at)?;
        log::debug!("Registered group '{}'", key);
        Ok(handle)
    }

    /// Resolve the root group and hand over the graph
    pub fn finish(self) -> Result<BuiltGraph> {
        let root = self.graph.lookup(ROOT_GROUP).ok_or_else(|| SceneError::UnresolvedReference {
            at: "groups".to_string(),
            name: ROOT_GROUP.to_string(),
        })?;

        let mut reachable = 0;
        self.graph.walk(root, |visit| {
            if !visit.revisit {
                reachable += 1;
            }
        })?;
        log::debug!(
            "Scene graph has {} nodes ({} reachable from root), {} lights",
            self.graph.len(),
            reachable,
            self.lights.len()
        );

        Ok(BuiltGraph {
            graph: self.graph,
            lights: self.lights,
            root,
        })
    }

    fn parse_group(&mut self, value: &Value, key: Option<&str>, depth: usize, at: &str) -> Result<NodeHandle> {
        if depth > self.max_depth {
            return Err(SceneError::conflict(
                at,
                format!("groups nested more than {} levels deep", self.max_depth),
            ));
        }

        let object = values::object(value, at)?;
        let fields = GROUP.validate(object, at)?;
        fields.check_values()?;

        let name = match (key, fields.text("name")?) {
            (Some(key), Some(name)) if key != name => {
                return Err(SceneError::conflict(
                    fields.at("name"),
                    format!("group \"{key}\" is named \"{name}\""),
                ));
            }
            (Some(key), _) => Some(key),
            (None, name) => name,
        };

        let handle = self.graph.insert(SceneNode::new());
        if let Some(name) = name {
            self.register(name, handle, at)?;
        }

        self.building.push(handle);
        let body = self.parse_group_body(&fields, depth);
        self.building.pop();

        if let Some(slot) = self.graph.get_mut(handle) {
            *slot = body?;
        }
        Ok(handle)
    }

    /// Lists are read in the order their keys appear in the group
    fn parse_group_body(&mut self, fields: &Fields<'_>, depth: usize) -> Result<SceneNode> {
        let mut node = SceneNode::new();

        for key in fields.keys() {
            let list_at = fields.at(key);
            let items = match key {
                "type" | "name" => continue,
                "transforms" | "lights" | "primitives" | "children" => values::array(fields.require(key)?, &list_at)?,
                other => return Err(SceneError::unknown_field(fields.location(), other)),
            };

            for (i, item) in items.iter().enumerate() {
                let item_at = index_at(&list_at, i);
                match key {
                    "transforms" => node.transformations.push(entities::parse_transformation(item, &item_at)?),
                    "lights" => {
                        let light = entities::parse_light_data(item, self.lights.len(), &item_at)?;
                        self.lights.push(light);
                    }
                    "primitives" => node.primitives.push(self.parse_primitive(item, &item_at)?),
                    _ => self.parse_child(item, &mut node, depth, &item_at)?,
                }
            }
        }

        Ok(node)
    }

    fn parse_child(&mut self, value: &Value, node: &mut SceneNode, depth: usize, at: &str) -> Result<()> {
        let object = values::object(value, at)?;
        let object_type = object.get("type").ok_or_else(|| SceneError::missing_field(at, "type"))?;

        match schema::enum_value(object_type, &OBJECT_TYPES, &field_at(at, "type"))? {
            "tree" => {
                let child = self.parse_group(value, None, depth + 1, at)?;
                node.children.push(child);
            }
            "primitive" => node.primitives.push(self.parse_primitive(value, at)?),
            "master" => node.children.push(self.resolve_master(object, at)?),
            other => return Err(SceneError::invalid_enum(field_at(at, "type"), other, &OBJECT_TYPES)),
        }
        Ok(())
    }

    fn parse_primitive(&self, value: &Value, at: &str) -> Result<Primitive> {
        let primitive = entities::parse_primitive(value, &self.assets, at)?;
        log::trace!("Primitive {} at {}", primitive.kind, at);
        Ok(primitive)
    }

    fn resolve_master(&self, object: &JsonObject, at: &str) -> Result<NodeHandle> {
        let fields = MASTER.validate(object, at)?;
        fields.check_values()?;
        let name = values::text(fields.require("name")?, &fields.at("name"))?;

        let handle = self.graph.lookup(name).ok_or_else(|| SceneError::UnresolvedReference {
            at: fields.at("name"),
            name: name.to_string(),
        })?;
        if self.building.contains(&handle) {
            return Err(SceneError::CyclicReference {
                at: fields.at("name"),
                name: name.to_string(),
            });
        }

        log::trace!("Master reference to '{}' at {}", name, at);
        Ok(handle)
    }

    fn register(&mut self, name: &str, handle: NodeHandle, at: &str) -> Result<()> {
        self.graph.register(name, handle).map_err(|_| SceneError::DuplicateName {
            at: at.to_string(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn builder() -> GraphBuilder {
        GraphBuilder::new(
            AssetPaths {
                mesh_base: PathBuf::from("/scenes"),
                texture_base: PathBuf::from("/scenes/demo"),
            },
            8,
        )
    }

    #[test]
    fn test_child_primitive_lands_on_parent() {
        let mut builder = builder();
        let root = builder
            .add_group(
                "root",
                &json!({
                    "primitives": [{"name": "cube"}],
                    "children": [{"type": "primitive", "name": "sphere"}]
                }),
                "groups.root",
            )
            .unwrap();
        let built = builder.finish().unwrap();
        assert_eq!(built.root, root);
        let node = built.graph.get(root).unwrap();
        assert_eq!(node.primitives.len(), 2);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_lists_follow_key_order() {
        let mut builder = builder();
        builder
            .add_group(
                "root",
                &json!({
                    "children": [{"type": "tree", "lights": [{"type": "point", "id": 7}]}],
                    "lights": [{"type": "directional"}]
                }),
                "groups.root",
            )
            .unwrap();
        let built = builder.finish().unwrap();
        let ids: Vec<i32> = built.lights.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![7, 1]);
    }

    #[test]
    fn test_unknown_child_type() {
        let mut builder = builder();
        let err = builder
            .add_group("root", &json!({"children": [{"type": "light"}]}), "groups.root")
            .unwrap_err();
        match err {
            SceneError::InvalidEnumValue { at, value, .. } => {
                assert_eq!(at, "groups.root.children[0].type");
                assert_eq!(value, "light");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_child_requires_type() {
        let mut builder = builder();
        let err = builder
            .add_group("root", &json!({"children": [{"name": "cube"}]}), "groups.root")
            .unwrap_err();
        assert!(matches!(err, SceneError::MissingField { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let mut builder = builder();
        let err = builder
            .add_group("root", &json!({"children": [{"type": "master", "name": "root"}]}), "groups.root")
            .unwrap_err();
        assert!(matches!(err, SceneError::CyclicReference { ref name, .. } if name == "root"));
    }

    #[test]
    fn test_reference_to_enclosing_tree_is_cyclic() {
        let mut builder = builder();
        let err = builder
            .add_group(
                "root",
                &json!({"children": [{
                    "type": "tree", "name": "arm",
                    "children": [{"type": "tree", "children": [{"type": "master", "name": "arm"}]}]
                }]}),
                "groups.root",
            )
            .unwrap_err();
        assert!(matches!(err, SceneError::CyclicReference { .. }));
    }

    #[test]
    fn test_key_and_name_must_agree() {
        let mut builder = builder();
        let err = builder.add_group("root", &json!({"name": "other"}), "groups.root").unwrap_err();
        assert!(matches!(err, SceneError::StructuralConflict { .. }));
        assert!(builder.add_group("root", &json!({"name": "root"}), "groups.root").is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let mut builder = GraphBuilder::new(AssetPaths::rooted_at(std::path::Path::new("/")), 1);
        let err = builder
            .add_group(
                "root",
                &json!({"children": [{"type": "tree", "children": [{"type": "tree"}]}]}),
                "groups.root",
            )
            .unwrap_err();
        match err {
            SceneError::StructuralConflict { at, .. } => assert_eq!(at, "groups.root.children[0].children[0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_finish_without_root() {
        let mut builder = builder();
        builder.add_group("leaf", &json!({}), "groups.leaf").unwrap();
        let err = builder.finish().unwrap_err();
        assert!(matches!(err, SceneError::UnresolvedReference { ref name, .. } if name == "root"));
    }
}
