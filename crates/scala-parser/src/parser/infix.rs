/// Precedence tier of an infix operator, derived from its first character.
///
/// Lowest to highest: assignment operators, alphanumeric operators, `|`,
/// `^`, `&`, `=`/`!`, `<`/`>`, `:`, `+`/`-`, `*`/`/`/`%`, other symbolic
/// characters. The synthetic `match` operator sits on its own tier above
/// every identifier operator.
pub(crate) fn operator_precedence(op: &str) -> u8 {
    if op == "match" {
        return 11;
    }
    if is_assignment_op(op) {
        return 0;
    }
    match op.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => 1,
        Some('|') => 2,
        Some('^') => 3,
        Some('&') => 4,
        Some('=') | Some('!') => 5,
        Some('<') | Some('>') => 6,
        Some(':') => 7,
        Some('+') | Some('-') => 8,
        Some('*') | Some('/') | Some('%') => 9,
        _ => 10,
    }
}

/// Assignment operators (`+=`, `::=`, ...) take the lowest tier. Comparison
/// spellings ending in `=` are not assignments.
fn is_assignment_op(op: &str) -> bool {
    op.len() > 1
        && op.ends_with('=')
        && !op.starts_with('=')
        && !matches!(op, "<=" | ">=" | "!=")
}

/// Right-associative iff the textual form ends with `:`.
pub(crate) fn is_right_assoc(op: &str) -> bool {
    op.ends_with(':')
}

/// Strip backquotes from an identifier used as an operator name.
pub(crate) fn op_name(text: &str) -> String {
    if text.starts_with('`') && text.ends_with('`') && text.len() >= 2 {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

/// One suspended infix application, waiting for its right-hand side.
#[derive(Debug)]
pub(crate) struct UnfinishedInfix<L> {
    /// Token index where the left-hand side begins
    pub lhs_start: usize,
    /// The left-hand side
    pub lhs: L,
    /// Operator name (backquotes stripped)
    pub op: String,
    /// Byte offset of the operator, for diagnostics
    pub op_offset: usize,
    /// Type arguments applied to the operator
    pub targs: Vec<Type>,
}

/// Capability interface shared by the term and pattern infix parsers.
pub(crate) trait InfixContext {
    /// Left-hand side representation
    type Lhs;
    /// Right-hand side representation
    type Rhs;
    /// A completed infix application
    type Finished;

    /// Convert a right-hand side into a left-hand side for the next frame.
    fn to_lhs(&self, p: &Parser, rhs: Self::Rhs, start: usize) -> Self::Lhs;

    /// Convert a completed application back into a right-hand side.
    fn to_rhs(&self, finished: Self::Finished) -> Self::Rhs;

    /// Complete a suspended frame with its right-hand side.
    fn finish(
        &self,
        p: &mut Parser,
        frame: UnfinishedInfix<Self::Lhs>,
        rhs: Self::Rhs,
        rhs_end: usize,
    ) -> ParseResult<Self::Finished>;
}

/// Pop and finish frames above `base` whose operator dominates the
/// incoming one: strictly greater precedence, or equal precedence with
/// left associativity. Equal precedence with disagreeing associativity is
/// a hard error. `incoming = None` drains the stack to `base`.
pub(crate) fn reduce_stack<C: InfixContext>(
    ctx: &C,
    p: &mut Parser,
    stack: &mut Vec<UnfinishedInfix<C::Lhs>>,
    base: usize,
    mut curr: C::Rhs,
    curr_end: usize,
    incoming: Option<&str>,
) -> ParseResult<C::Rhs> {
    let in_prec = incoming.map(operator_precedence);
    let in_right = incoming.map(is_right_assoc);
    while stack.len() > base {
        let (top_prec, top_right, top_offset) = match stack.last() {
            Some(top) => (
                operator_precedence(&top.op),
                is_right_assoc(&top.op),
                top.op_offset,
            ),
            None => break,
        };
        let dominates = match (in_prec, in_right) {
            (None, _) => true,
            (Some(ip), Some(ir)) => {
                if top_prec == ip {
                    if top_right != ir {
                        let message = "left- and right-associative operators with same \
                                       precedence may not be mixed";
                        p.report_error(message.to_string());
                        return Err(ParseError::syntax(message, top_offset));
                    }
                    !top_right
                } else {
                    top_prec > ip
                }
            }
            (Some(_), None) => unreachable!("incoming precedence without associativity"),
        };
        if !dominates {
            break;
        }
        let frame = match stack.pop() {
            Some(f) => f,
            None => break,
        };
        trace!(op = %frame.op, "reduce infix frame");
        let finished = ctx.finish(p, frame, curr, curr_end)?;
        curr = ctx.to_rhs(finished);
    }
    Ok(curr)
}

/// Term-side infix context: right-hand sides are argument lists so that
/// `a op (b, c)` applies the operator to both values.
pub(crate) struct TermInfixContext;

impl InfixContext for TermInfixContext {
    type Lhs = Term;
    type Rhs = Vec<Term>;
    type Finished = Term;

    fn to_lhs(&self, p: &Parser, mut rhs: Vec<Term>, start: usize) -> Term {
        if rhs.len() == 1 {
            match rhs.pop() {
                Some(single) => single,
                None => Term::new(TermKind::Lit(Lit::Unit), p.origin_between(start, start)),
            }
        } else {
            let origin = p.origin_between(start, p.cursor.end_index());
            Term::new(TermKind::Tuple(rhs), origin)
        }
    }

    fn to_rhs(&self, finished: Term) -> Vec<Term> {
        vec![finished]
    }

    fn finish(
        &self,
        p: &mut Parser,
        frame: UnfinishedInfix<Term>,
        rhs: Vec<Term>,
        rhs_end: usize,
    ) -> ParseResult<Term> {
        let origin = p.origin_between(frame.lhs_start, rhs_end);
        if frame.op == "match" {
            // The synthetic match operator requires a single block of cases.
            let mut rhs = rhs;
            let arg = match (rhs.len(), rhs.pop()) {
                (1, Some(arg)) => arg,
                _ => {
                    p.report_error("match statement requires cases".to_string());
                    return Err(ParseError::syntax(
                        "match statement requires cases",
                        frame.op_offset,
                    ));
                }
            };
            match arg.kind {
                TermKind::PartialFunction(cases) => Ok(Term::new(
                    TermKind::Match { expr: Box::new(frame.lhs), cases },
                    origin,
                )),
                _ => {
                    p.report_error("match statement requires cases".to_string());
                    Err(ParseError::syntax(
                        "match statement requires cases",
                        frame.op_offset,
                    ))
                }
            }
        } else {
            Ok(Term::new(
                TermKind::ApplyInfix {
                    lhs: Box::new(frame.lhs),
                    op: frame.op,
                    targs: frame.targs,
                    args: rhs,
                },
                origin,
            ))
        }
    }
}

/// Pattern-side infix context: a tuple right-hand side splats into the
/// extractor's argument list.
pub(crate) struct PatInfixContext;

impl InfixContext for PatInfixContext {
    type Lhs = Pat;
    type Rhs = Pat;
    type Finished = Pat;

    fn to_lhs(&self, _p: &Parser, rhs: Pat, _start: usize) -> Pat {
        rhs
    }

    fn to_rhs(&self, finished: Pat) -> Pat {
        finished
    }

    fn finish(
        &self,
        p: &mut Parser,
        frame: UnfinishedInfix<Pat>,
        rhs: Pat,
        rhs_end: usize,
    ) -> ParseResult<Pat> {
        let origin = p.origin_between(frame.lhs_start, rhs_end);
        let args = match rhs.kind {
            PatKind::Tuple(items) => items,
            _ => vec![rhs],
        };
        Ok(Pat::new(
            PatKind::ExtractInfix { lhs: Box::new(frame.lhs), op: frame.op, rhs: args },
            origin,
        ))
    }
}

#[cfg(test)]
mod infix_unit_tests {
    use super::{is_assignment_op, is_right_assoc, op_name, operator_precedence};

    #[test]
    fn precedence_tiers() {
        assert!(operator_precedence("*") > operator_precedence("+"));
        assert!(operator_precedence("+") > operator_precedence("::"));
        assert!(operator_precedence("::") > operator_precedence("<"));
        assert!(operator_precedence("<") > operator_precedence("=="));
        assert!(operator_precedence("==") > operator_precedence("&"));
        assert!(operator_precedence("&") > operator_precedence("^"));
        assert!(operator_precedence("^") > operator_precedence("|"));
        assert!(operator_precedence("|") > operator_precedence("max"));
        assert!(operator_precedence("max") > operator_precedence("+="));
        assert!(operator_precedence("~!") > operator_precedence("*"));
        assert!(operator_precedence("match") > operator_precedence("~!"));
        assert!(operator_precedence("match") > operator_precedence("m*"));
    }

    #[test]
    fn associativity_from_trailing_colon() {
        assert!(is_right_assoc("::"));
        assert!(is_right_assoc("+:"));
        assert!(!is_right_assoc("+"));
        assert!(!is_right_assoc("::+"));
    }

    #[test]
    fn assignment_ops() {
        assert!(is_assignment_op("+="));
        assert!(is_assignment_op("::="));
        assert!(!is_assignment_op("=="));
        assert!(!is_assignment_op("<="));
        assert!(!is_assignment_op("!="));
    }

    #[test]
    fn backquote_stripping() {
        assert_eq!(op_name("`+`"), "+");
        assert_eq!(op_name("map"), "map");
    }
}
