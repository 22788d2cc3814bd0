// object.rs - scene-graph node attached under a panorama

use crate::infospot::{HotspotId, Infospot};
use glam::Vec3;

#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Plain container or externally rendered content.
    Group,
    Infospot(Box<Infospot>),
}

#[derive(Debug, Clone)]
pub struct Object3D {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
    pub visible: bool,
    pub kind: ObjectKind,
    pub children: Vec<Object3D>,
}

impl Object3D {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
            kind: ObjectKind::Group,
            children: Vec::new(),
        }
    }

    pub fn from_infospot(spot: Infospot) -> Self {
        Self {
            name: "infospot".to_string(),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
            kind: ObjectKind::Infospot(Box::new(spot)),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: Object3D) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn is_infospot(&self) -> bool {
        matches!(self.kind, ObjectKind::Infospot(_))
    }

    pub fn as_infospot(&self) -> Option<&Infospot> {
        match &self.kind {
            ObjectKind::Infospot(spot) => Some(&**spot),
            ObjectKind::Group => None,
        }
    }

    pub fn as_infospot_mut(&mut self) -> Option<&mut Infospot> {
        match &mut self.kind {
            ObjectKind::Infospot(spot) => Some(&mut **spot),
            ObjectKind::Group => None,
        }
    }

    /// Depth-first, self first.
    pub fn traverse(&self, f: &mut impl FnMut(&Object3D)) {
        f(self);
        for child in &self.children {
            child.traverse(f);
        }
    }

    pub fn traverse_mut(&mut self, f: &mut impl FnMut(&mut Object3D)) {
        f(self);
        for child in &mut self.children {
            child.traverse_mut(f);
        }
    }

    pub fn find_infospot(&self, id: HotspotId) -> Option<&Infospot> {
        if let Some(spot) = self.as_infospot().filter(|s| s.id == id) {
            return Some(spot);
        }
        self.children.iter().find_map(|c| c.find_infospot(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traverse_visits_whole_subtree() {
        let mut root = Object3D::new("root");
        let mut group = Object3D::new("group");
        group.add(Object3D::from_infospot(Infospot::new(1.0, "a")));
        root.add(group).add(Object3D::new("leaf"));

        let mut names = Vec::new();
        root.traverse(&mut |o| names.push(o.name.clone()));
        assert_eq!(names, vec!["root", "group", "infospot", "leaf"]);
    }

    #[test]
    fn find_nested_infospot() {
        let spot = Infospot::new(1.0, "a");
        let id = spot.id;
        let mut group = Object3D::new("group");
        group.add(Object3D::from_infospot(spot));
        let mut root = Object3D::new("root");
        root.add(group);

        assert!(root.find_infospot(id).is_some());
        assert!(root.find_infospot(HotspotId::new()).is_none());
    }
}
