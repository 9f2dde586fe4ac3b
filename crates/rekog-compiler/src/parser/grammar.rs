//! ABNF productions.
//!
//! ```text
//! rulelist      = *( rule / junk )
//! rule          = rulename ( "=" / "=/" ) alternation
//! alternation   = concatenation *( "/" concatenation )
//! concatenation = repetition *repetition
//! repetition    = [ repeat ] element
//! repeat        = number / [ number ] ( "*" / "#" ) [ number ]
//! element       = rulename / group / option / char-val / num-val / prose-val
//! ```
//!
//! A token in column 0 always ends the current rule, which is what makes
//! line continuation (indentation) significant.

use super::core::Parser;
use super::cst::SyntaxKind::{self, *};
use super::cst::token_sets::{DEFINED_AS, ELEMENT_FIRST, REPEAT_FIRST, REPETITION_FIRST};
use crate::diagnostics::DiagnosticKind;

impl Parser<'_> {
    pub(super) fn parse_root(&mut self) {
        self.start_node(Root);
        loop {
            self.skip_trivia_to_buffer();
            if self.eof() {
                break;
            }
            if self.currently_is(RuleName) {
                self.parse_rule();
            } else {
                self.error_until_rule_start(DiagnosticKind::ExpectedRuleName);
            }
        }
        self.drain_trivia();
        self.finish_node();
    }

    fn parse_rule(&mut self) {
        self.nesting_exceeded = false;
        self.start_node(Rule);
        self.bump();

        if !self.continues_with_one_of(DEFINED_AS) {
            let range = self.after_last_token();
            self.error_at(DiagnosticKind::ExpectedDefinedAs, range);
            self.skip_rest_of_rule(false);
            self.finish_node();
            return;
        }
        self.bump();

        self.parse_alternation();
        self.skip_rest_of_rule(true);
        self.finish_node();
    }

    /// Leftover tokens on the rule's lines become one `Error` node.
    fn skip_rest_of_rule(&mut self, report: bool) {
        self.skip_trivia_to_buffer();
        if self.eof() || self.at_rule_start() {
            return;
        }
        if report && !self.nesting_exceeded {
            self.error(DiagnosticKind::UnexpectedToken);
        }
        self.start_node(Error);
        while !self.at_rule_start() && !self.eof() {
            self.bump();
        }
        self.finish_node();
    }

    fn parse_alternation(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_concatenation();
        if !self.continues_with(Slash) {
            return;
        }

        self.start_node_at(checkpoint, Alternation);
        while self.continues_with(Slash) {
            self.bump();
            self.parse_concatenation();
        }
        self.finish_node();
    }

    fn parse_concatenation(&mut self) {
        if !self.continues_with_one_of(REPETITION_FIRST) {
            let range = self.after_last_token();
            if !self.nesting_exceeded {
                self.error_at(DiagnosticKind::ExpectedElement, range);
            }
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_repetition();
        if !self.continues_with_one_of(REPETITION_FIRST) {
            return;
        }

        self.start_node_at(checkpoint, Concatenation);
        while self.continues_with_one_of(REPETITION_FIRST) {
            self.parse_repetition();
        }
        self.finish_node();
    }

    fn parse_repetition(&mut self) {
        if !self.currently_is_one_of(REPEAT_FIRST) {
            self.parse_element();
            return;
        }

        self.start_node(Repetition);
        self.parse_repeat();

        // The element must follow the repeat without intervening trivia.
        if ELEMENT_FIRST.contains(self.nth_raw(0)) {
            self.parse_element();
        } else {
            let range = self.after_last_token();
            self.error_msg_at(
                DiagnosticKind::ExpectedElement,
                range,
                "no element directly after the repeat",
            );
        }
        self.finish_node();
    }

    /// `n`, `n*m`, `*m`, `n*`, `*` and the `#` list forms. Parts are adjacent.
    fn parse_repeat(&mut self) {
        self.start_node(Repeat);
        if self.nth_raw(0) == Number {
            self.bump();
        }
        if matches!(self.nth_raw(0), Star | Hash) {
            self.bump();
            if self.nth_raw(0) == Number {
                self.bump();
            }
        }
        self.finish_node();
    }

    fn parse_element(&mut self) {
        match self.current() {
            RuleName => self.bump_as(Ref),
            CharVal => self.bump_as(Str),
            NumVal => self.bump_as(Num),
            ProseVal => self.bump_as(Prose),
            ParenOpen => self.parse_group(Group, ParenClose, DiagnosticKind::UnclosedGroup),
            BracketOpen => {
                self.parse_group(Optional, BracketClose, DiagnosticKind::UnclosedOption)
            }
            UnterminatedStr => self.error_and_bump(DiagnosticKind::UnterminatedString),
            _ => self.error_and_bump(DiagnosticKind::UnexpectedToken),
        }
    }

    fn parse_group(&mut self, kind: SyntaxKind, close: SyntaxKind, unclosed: DiagnosticKind) {
        let open = self.current_span();
        self.start_node(kind);
        self.bump();

        if !self.enter_recursion() {
            let limit = self.recursion_limit();
            self.error_msg_at(
                DiagnosticKind::NestingTooDeep,
                open,
                format!("more than {limit} levels"),
            );
            self.nesting_exceeded = true;
            self.start_node(Error);
            while !self.at_rule_start() && !self.eof() {
                self.bump();
            }
            self.finish_node();
            self.finish_node();
            return;
        }

        self.parse_alternation();
        self.exit_recursion();

        if self.continues_with(close) {
            self.bump();
        } else if !self.nesting_exceeded {
            let opened = if kind == Group {
                "group opened here"
            } else {
                "option opened here"
            };
            self.error_unclosed_delimiter(unclosed, opened, open);
        }
        self.finish_node();
    }
}
