//! Literals, templates, array literals and JSX.

use crate::judgment::TypeJudgment;
use gts_ast::NodeData;
use gts_common::NodeIndex;
use gts_solver::{DefId, Environment, TypeId, widen_literals};

impl<'a> TypeJudgment<'a> {
    /// A template made of exactly one segment is a string literal type.
    pub(crate) fn type_of_template(&self, parts: &[NodeIndex]) -> TypeId {
        match parts {
            [only] => match self.data(*only) {
                Some(NodeData::TemplateSegment(text)) => self.types().literal_string_atom(*text),
                _ => TypeId::STRING,
            },
            _ => TypeId::STRING,
        }
    }

    pub(crate) fn type_of_tagged_template(&self, env: &Environment, tag: NodeIndex) -> TypeId {
        let tag_type = self.infer_node(env, tag);
        self.types()
            .function_shape(tag_type)
            .map_or(TypeId::UNKNOWN, |shape| shape.return_type)
    }

    /// `Array<join(elements)>`, element literals widened; `Array<any>` when
    /// there is no element.
    pub(crate) fn type_of_array_literal(
        &self,
        env: &Environment,
        elements: &[NodeIndex],
    ) -> TypeId {
        let simplifier = self.simplifier();
        let mut element_types = Vec::with_capacity(elements.len());
        for &element in elements {
            let ty = match self.data(element) {
                None | Some(NodeData::ArrayPadding) => continue,
                Some(NodeData::ArrayElement {
                    expression,
                    is_spread: true,
                }) => {
                    let spread = self.infer_node(env, *expression);
                    self.iterable_element_type(env, spread, false)
                        .unwrap_or(TypeId::ANY)
                }
                Some(_) => self.infer_node(env, element),
            };
            element_types.push(widen_literals(&simplifier, env, ty));
        }
        let element = if element_types.is_empty() {
            TypeId::ANY
        } else {
            self.join(env, &element_types)
        };
        self.db.builtins.array_of(self.types(), element)
    }

    /// `[]`, possibly parenthesized.
    pub(crate) fn is_empty_array_literal(&self, idx: NodeIndex) -> bool {
        match self.data(idx) {
            Some(NodeData::Paren { expression }) => self.is_empty_array_literal(*expression),
            Some(NodeData::ArrayLiteral { elements }) => elements
                .iter()
                .all(|&e| matches!(self.data(e), Some(NodeData::ArrayPadding) | None)),
            _ => false,
        }
    }

    pub(crate) fn type_of_jsx_element(
        &self,
        element_class: Option<DefId>,
        props: Option<TypeId>,
    ) -> TypeId {
        let Some(class) = element_class else {
            return TypeId::UNKNOWN;
        };
        let types = self.types();
        let generic = self
            .db
            .def(class)
            .is_some_and(|info| !info.type_params.is_empty());
        match props {
            Some(props) if generic => types.nominal(class, vec![props]),
            _ => types.nominal_simple(class),
        }
    }
}

#[cfg(test)]
#[path = "../tests/literals_tests.rs"]
mod tests;
