//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The emitter (spec.md §4.11): walks the final Y-tree depth-first and
//! prints the YANG 1.1 module text.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::error::Error;
use crate::lens::LensKind;
use crate::ltree::LNodeId;
use crate::ltree::LTree;
use crate::regex_translate;
use crate::yforest::choice_union_of;
use crate::ynode::{YNodeFlags, YNodeId, YNodeKind, YTree};

const INDENT: &str = "  ";

struct Emitter<'a> {
    ltree: &'a LTree<'a>,
    ytree: &'a YTree,
    out: String,
    uses_inet: bool,
    annotate_ids: bool,
}

/// Prints the final `ytree` as a complete YANG 1.1 module named after
/// `module_name` (underscores translated to hyphens, spec.md §6.3).
pub fn emit(module_name: &str, ltree: &LTree<'_>, ytree: &YTree) -> Result<String, Error> {
    emit_with_options(module_name, ltree, ytree, false)
}

/// Like [`emit`], additionally appending a trailing `// id=N` comment to
/// every emitted statement when `annotate_ids` is set (the
/// `YNODE_ID_IN_YANG` debug dump checkpoint), so a Y-tree text dump can
/// be cross-referenced against the emitted YANG by stable id.
pub fn emit_with_options(
    module_name: &str,
    ltree: &LTree<'_>,
    ytree: &YTree,
    annotate_ids: bool,
) -> Result<String, Error> {
    let yang_name = module_name.replace('_', "-");
    let uses_inet = tree_uses_inet_types(ltree, ytree);

    let mut e = Emitter {
        ltree,
        ytree,
        out: String::new(),
        uses_inet,
        annotate_ids,
    };
    e.header(&yang_name, module_name);

    for child in ytree.children(ytree.root()) {
        e.node(child, 1);
    }

    writeln!(e.out, "}}").ok();
    Ok(e.out)
}

fn tree_uses_inet_types(ltree: &LTree<'_>, ytree: &YTree) -> bool {
    for id in ytree.walk_all() {
        let node = ytree.get(id);
        for slot in [node.label, node.value] {
            if let Some(l) = slot {
                if is_inet_lens(ltree, l) {
                    return true;
                }
            }
        }
    }
    false
}

fn is_inet_lens(ltree: &LTree<'_>, id: LNodeId) -> bool {
    match &ltree.get(id).lens.name {
        Some(name) => {
            let name = name.trim_start_matches("Rx.");
            matches!(name, "ip" | "ipv4" | "ipv6")
        }
        None => false,
    }
}

impl<'a> Emitter<'a> {
    fn header(&mut self, yang_name: &str, module_name: &str) {
        writeln!(self.out, "module {yang_name} {{").ok();
        writeln!(self.out, "{INDENT}yang-version 1.1;").ok();
        writeln!(self.out, "{INDENT}namespace \"urn:augeas:{yang_name}\";").ok();
        writeln!(self.out, "{INDENT}prefix \"{yang_name}\";").ok();
        writeln!(self.out).ok();
        writeln!(self.out, "{INDENT}import augeas-extension {{").ok();
        writeln!(self.out, "{INDENT}{INDENT}prefix augex;").ok();
        writeln!(self.out, "{INDENT}}}").ok();
        if self.uses_inet {
            writeln!(self.out, "{INDENT}import ietf-inet-types {{").ok();
            writeln!(self.out, "{INDENT}{INDENT}prefix inet;").ok();
            writeln!(self.out, "{INDENT}}}").ok();
        }
        writeln!(self.out).ok();
        writeln!(self.out, "{INDENT}augex:augeas-mod-name \"{module_name}\";").ok();
        writeln!(self.out).ok();
    }

    fn indent(level: usize) -> String {
        INDENT.repeat(level)
    }

    fn data_path(&self, id: YNodeId) -> Option<String> {
        let node = self.ytree.get(id);
        let label = node.label?;
        let lens = &self.ltree.get(label).lens;
        match lens.literal() {
            Some(lit) => Some(lit.to_owned()),
            None => lens.name.clone(),
        }
    }

    fn value_yang_path(&self, id: YNodeId) -> Option<String> {
        let value_child = self
            .ytree
            .children(id)
            .find(|&c| self.ytree.get(c).kind == YNodeKind::Value)?;
        self.ytree.get(value_child).ident.clone()
    }

    fn node(&mut self, id: YNodeId, level: usize) {
        let kind = self.ytree.get(id).kind;
        match kind {
            YNodeKind::Container => self.container(id, level),
            YNodeKind::List => self.list(id, level),
            YNodeKind::Leaf | YNodeKind::Key => self.leaf(id, level, "leaf"),
            YNodeKind::LeafList => self.leaf_list(id, level),
            YNodeKind::Leafref => self.leafref(id, level),
            YNodeKind::Case => self.case(id, level),
            YNodeKind::Grouping => self.grouping(id, level),
            YNodeKind::Uses => self.uses(id, level),
            YNodeKind::Value | YNodeKind::Unknown | YNodeKind::Rec | YNodeKind::Root => {}
        }
    }

    fn ident_of(&self, id: YNodeId) -> String {
        self.ytree
            .get(id)
            .ident
            .clone()
            .unwrap_or_else(|| "node".to_owned())
    }

    fn open_statement_for(&mut self, keyword: &str, ident: &str, level: usize, id: Option<YNodeId>) {
        let pad = Self::indent(level);
        if self.annotate_ids {
            if let Some(id) = id {
                let stable_id = self.ytree.get(id).id;
                writeln!(self.out, "{pad}{keyword} {ident} {{ // id={stable_id}").ok();
                return;
            }
        }
        writeln!(self.out, "{pad}{keyword} {ident} {{").ok();
    }

    fn close_statement(&mut self, level: usize) {
        let pad = Self::indent(level);
        writeln!(self.out, "{pad}}}").ok();
    }

    fn emit_common(&mut self, id: YNodeId, level: usize) {
        let pad = Self::indent(level);
        let node = self.ytree.get(id);
        if let Some(path) = self.data_path(id) {
            writeln!(self.out, "{pad}augex:data-path \"{path}\";").ok();
        }
        if let Some(path) = self.value_yang_path(id) {
            writeln!(self.out, "{pad}augex:value-yang-path \"{path}\";").ok();
        }
        if let (Some(when_ref), Some(when_val)) = (node.when_ref, node.when_val.clone()) {
            if let Some(target) = self.ytree.position(when_ref) {
                let target_ident = self.ident_of(target);
                if when_val.contains('\'') {
                    // spec.md §7: XPath 1.0 can't quote an apostrophe inside
                    // a literal, so this when is printed but commented out
                    // rather than silently dropped.
                    writeln!(
                        self.out,
                        "{pad}// when \"../{target_ident} = '{when_val}'\";"
                    )
                    .ok();
                } else {
                    writeln!(
                        self.out,
                        "{pad}when \"../{target_ident} = '{when_val}'\";"
                    )
                    .ok();
                }
            }
        }
        if node.min_elems > 0 {
            writeln!(self.out, "{pad}min-elements {};", node.min_elems).ok();
        }
    }

    /// Emits `parent`'s children, grouping `CASE` siblings that belong to
    /// the same `UNION` under one synthesized `choice` statement (spec.md
    /// §3.4's `choice` field only tracks the branch; the `choice`
    /// statement itself is assembled here at print time). Identifiers
    /// follow spec.md §4.10: `ch-<parent>`, with a numeric suffix when a
    /// parent holds more than one independent choice.
    fn emit_children(&mut self, parent: YNodeId, level: usize) {
        let children: Vec<YNodeId> = self.ytree.children(parent).collect();
        let parent_ident = self.ident_of(parent);
        let base = if parent_ident.starts_with("ch-") {
            parent_ident
        } else {
            format!("ch-{parent_ident}")
        };

        let mut groups: Vec<(LNodeId, Vec<YNodeId>)> = Vec::new();
        for &child in &children {
            if self.ytree.get(child).kind != YNodeKind::Case {
                continue;
            }
            let Some(branch) = self.ytree.get(child).choice else {
                continue;
            };
            let union = choice_union_of(self.ltree, branch).unwrap_or(branch);
            match groups.iter_mut().find(|(u, _)| *u == union) {
                Some((_, members)) => members.push(child),
                None => groups.push((union, vec![child])),
            }
        }
        let multiple = groups.len() > 1;

        let mut emitted: HashSet<YNodeId> = HashSet::new();
        let mut group_idx = 0usize;
        for &child in &children {
            if emitted.contains(&child) {
                continue;
            }
            if self.ytree.get(child).kind != YNodeKind::Case {
                self.node(child, level);
                continue;
            }
            let Some(branch) = self.ytree.get(child).choice else {
                self.node(child, level);
                continue;
            };
            let union = choice_union_of(self.ltree, branch).unwrap_or(branch);
            let members = &groups.iter().find(|(u, _)| *u == union).unwrap().1;
            let ident = if multiple {
                group_idx += 1;
                format!("{base}{group_idx}")
            } else {
                base.clone()
            };
            let pad = Self::indent(level);
            writeln!(self.out, "{pad}choice {ident} {{").ok();
            for &member in members {
                self.case(member, level + 1);
                emitted.insert(member);
            }
            writeln!(self.out, "{pad}}}").ok();
        }
    }

    fn container(&mut self, id: YNodeId, level: usize) {
        let ident = self.ident_of(id);
        self.open_statement_for("container", &ident, level, Some(id));
        self.emit_common(id, level + 1);
        let pad = Self::indent(level + 1);
        writeln!(self.out, "{pad}presence \"config entry\";").ok();
        self.emit_children(id, level + 1);
        self.close_statement(level);
    }

    fn list(&mut self, id: YNodeId, level: usize) {
        let ident = self.ident_of(id);
        self.open_statement_for("list", &ident, level, Some(id));
        self.emit_common(id, level + 1);
        let pad = Self::indent(level + 1);
        let key_ident = self
            .ytree
            .children(id)
            .find(|&c| self.ytree.get(c).kind == YNodeKind::Key)
            .map(|c| self.ident_of(c))
            .unwrap_or_else(|| "_id".to_owned());
        writeln!(self.out, "{pad}key \"{key_ident}\";").ok();
        writeln!(self.out, "{pad}ordered-by user;").ok();
        self.emit_children(id, level + 1);
        self.close_statement(level);
    }

    fn case(&mut self, id: YNodeId, level: usize) {
        let ident = self.ident_of(id);
        self.open_statement_for("case", &ident, level, Some(id));
        self.emit_common(id, level + 1);
        self.emit_children(id, level + 1);
        self.close_statement(level);
    }

    fn grouping(&mut self, id: YNodeId, level: usize) {
        let ident = self.ident_of(id);
        self.open_statement_for("grouping", &ident, level, Some(id));
        self.emit_children(id, level + 1);
        self.close_statement(level);
    }

    fn uses(&mut self, id: YNodeId, level: usize) {
        let target = self
            .ytree
            .get(id)
            .reference
            .and_then(|r| self.ytree.position(r))
            .map(|g| self.ident_of(g))
            .unwrap_or_else(|| "gr".to_owned());
        let pad = Self::indent(level);
        writeln!(self.out, "{pad}uses {target};").ok();
    }

    fn leafref(&mut self, id: YNodeId, level: usize) {
        let ident = self.ident_of(id);
        let target = self
            .ytree
            .get(id)
            .reference
            .and_then(|r| self.ytree.position(r));
        let pad = Self::indent(level);
        writeln!(self.out, "{pad}leaf {ident} {{").ok();
        let inner = Self::indent(level + 1);
        match target {
            Some(list) => {
                let key_ident = self
                    .ytree
                    .children(list)
                    .find(|&c| self.ytree.get(c).kind == YNodeKind::Key)
                    .map(|c| self.ident_of(c))
                    .unwrap_or_else(|| "_r-id".to_owned());
                writeln!(self.out, "{inner}type leafref {{").ok();
                writeln!(self.out, "{inner}{INDENT}path \"../{key_ident}\";").ok();
                writeln!(self.out, "{inner}}}").ok();
            }
            None => {
                writeln!(self.out, "{inner}type leafref;").ok();
            }
        }
        self.close_statement(level);
    }

    fn leaf_list(&mut self, id: YNodeId, level: usize) {
        let ident = self.ident_of(id);
        let pad = Self::indent(level);
        writeln!(self.out, "{pad}leaf-list {ident} {{").ok();
        self.emit_common(id, level + 1);
        let ty = self.value_type(id);
        self.write_type(&ty, level + 1);
        self.close_statement(level);
    }

    fn leaf(&mut self, id: YNodeId, level: usize, keyword: &str) {
        let ident = self.ident_of(id);
        let pad = Self::indent(level);
        writeln!(self.out, "{pad}{keyword} {ident} {{").ok();
        self.emit_common(id, level + 1);
        let node = self.ytree.get(id);
        let mandatory = node.flags.contains(YNodeFlags::MAND_TRUE);
        if mandatory {
            writeln!(self.out, "{}mandatory true;", Self::indent(level + 1)).ok();
        }
        let ty = self.value_type(id);
        self.write_type(&ty, level + 1);
        self.close_statement(level);
    }

    fn value_type(&self, id: YNodeId) -> YangType {
        let node = self.ytree.get(id);
        if node.kind == YNodeKind::Key && node.value.is_none() && node.label.is_none() {
            // Synthetic `_id`/`_seq`/`_r-id` key: spec.md §6.3 fixes its
            // type as part of the datastore plugin ABI, not derived from
            // any lens (there is none).
            return YangType::Uint64;
        }
        if node.kind == YNodeKind::Leaf && node.value.is_none() {
            if let Some(label) = node.label {
                let lnode = self.ltree.get(label);
                let is_plain_label = matches!(lnode.lens.kind, LensKind::Label);
                let is_noregex_key = lnode
                    .flags
                    .contains(crate::ltree::LNodeFlags::KEY_NOREGEX);
                if is_plain_label || is_noregex_key {
                    // A leaf whose only lens is a fixed label carries no
                    // stored data of its own — it's a presence flag.
                    return YangType::Empty;
                }
            }
        }
        match node.value.or(node.label) {
            Some(l) => self.lens_type(l),
            None => YangType::String,
        }
    }

    fn lens_type(&self, l: LNodeId) -> YangType {
        let lens = &self.ltree.get(l).lens;
        if let Some(name) = &lens.name {
            match name.trim_start_matches("Rx.") {
                "integer" => return YangType::Uint64,
                "relinteger" => return YangType::Int64,
                "ip" | "ipv4" => return YangType::InetType("ipv4-address"),
                "ipv6" => return YangType::InetType("ipv6-address"),
                _ => {}
            }
        }
        if let Some(re) = lens.regexp() {
            match re.pattern.as_str() {
                "[0-9]+" => return YangType::Uint64,
                "[-+]?[0-9]+" => return YangType::Int64,
                "true|false" | "(true|false)" => return YangType::Boolean,
                pattern => {
                    if let Ok(translated) = regex_translate::translate(pattern, re.nocase) {
                        return YangType::Pattern(translated);
                    }
                }
            }
        }
        YangType::String
    }

    fn write_type(&mut self, ty: &YangType, level: usize) {
        let pad = Self::indent(level);
        match ty {
            YangType::Empty => {
                writeln!(self.out, "{pad}type empty;").ok();
            }
            YangType::Uint64 => {
                writeln!(self.out, "{pad}type uint64;").ok();
            }
            YangType::Int64 => {
                writeln!(self.out, "{pad}type int64;").ok();
            }
            YangType::Boolean => {
                writeln!(self.out, "{pad}type boolean;").ok();
            }
            YangType::InetType(name) => {
                writeln!(self.out, "{pad}type inet:{name};").ok();
            }
            YangType::String => {
                writeln!(self.out, "{pad}type string;").ok();
            }
            YangType::Pattern(pattern) => {
                writeln!(self.out, "{pad}type string {{").ok();
                let inner = format!("{pad}{INDENT}");
                writeln!(self.out, "{inner}pattern \"{pattern}\";").ok();
                writeln!(self.out, "{pad}}}").ok();
            }
        }
    }
}

enum YangType {
    Empty,
    Uint64,
    Int64,
    Boolean,
    InetType(&'static str),
    String,
    Pattern(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::{Lens, LensKind as LK, LensPayload, Module, Regexp, Span};

    fn leaf(kind: LK) -> Lens {
        Lens {
            kind,
            payload: LensPayload::None,
            span: Span::default(),
            name: None,
        }
    }

    #[test]
    fn emits_a_parseable_module_shell() {
        let key = leaf(LK::Key).with_regexp(Regexp::new("name"));
        let store = leaf(LK::Store).with_regexp(Regexp::new("[a-z]+"));
        let concat = leaf(LK::Concat(vec![key, store]));
        let subtree = leaf(LK::Subtree(Box::new(concat)));
        let module = Module::new("test", subtree);
        let ltree = crate::ltree::build(&module, false).unwrap();
        let mut ytree = crate::yforest::build(&ltree).unwrap();
        crate::classify::classify(&ltree, &mut ytree);

        let mut diagnostics = crate::error::Diagnostics::new();
        let mut ctx = crate::transform::Context {
            ltree: &ltree,
            module_name: "test",
            diagnostics: &mut diagnostics,
        };
        crate::transform::run(&mut ytree, &mut ctx).unwrap();

        let text = emit("test", &ltree, &ytree).unwrap();
        assert!(text.starts_with("module test {"));
        assert!(text.contains("augex:augeas-mod-name \"test\";"));
        assert!(text.trim_end().ends_with('}'));
    }
}
