/// Invokes `$callback!` with the full node catalog, one `Variant => visit_method` per kind.
/// Both [`NodeKind`] and [`Visitor`] are generated from this single list.
macro_rules! node_kinds {
    ($callback:ident) => {
        $callback! {
            CompilationUnit => visit_compilation_unit,
            NamespaceDeclaration => visit_namespace_declaration,
            ClassDeclaration => visit_class_declaration,
            InterfaceDeclaration => visit_interface_declaration,
            TraitDeclaration => visit_trait_declaration,
            FunctionDeclaration => visit_function_declaration,
            MethodDeclaration => visit_method_declaration,
            Closure => visit_closure,
            ClosureUse => visit_closure_use,
            FormalParameters => visit_formal_parameters,
            FormalParameter => visit_formal_parameter,
            TypeArray => visit_type_array,
            TypeCallable => visit_type_callable,
            ScalarType => visit_scalar_type,
            FieldDeclaration => visit_field_declaration,
            VariableDeclarator => visit_variable_declarator,
            ConstantDefinition => visit_constant_definition,
            ConstantDeclarator => visit_constant_declarator,
            ClassOrInterfaceReference => visit_class_or_interface_reference,
            ClassReference => visit_class_reference,
            ParentReference => visit_parent_reference,
            SelfReference => visit_self_reference,
            StaticReference => visit_static_reference,
            TraitReference => visit_trait_reference,
            TraitUseStatement => visit_trait_use_statement,
            TraitAdaptation => visit_trait_adaptation,
            TraitAdaptationAlias => visit_trait_adaptation_alias,
            TraitAdaptationPrecedence => visit_trait_adaptation_precedence,
            Scope => visit_scope,
            ScopeStatement => visit_scope_statement,
            Statement => visit_statement,
            EchoStatement => visit_echo_statement,
            ReturnStatement => visit_return_statement,
            BreakStatement => visit_break_statement,
            ContinueStatement => visit_continue_statement,
            ThrowStatement => visit_throw_statement,
            GotoStatement => visit_goto_statement,
            LabelStatement => visit_label_statement,
            GlobalStatement => visit_global_statement,
            UnsetStatement => visit_unset_statement,
            StaticVariableDeclaration => visit_static_variable_declaration,
            IfStatement => visit_if_statement,
            ElseIfStatement => visit_else_if_statement,
            WhileStatement => visit_while_statement,
            DoWhileStatement => visit_do_while_statement,
            ForStatement => visit_for_statement,
            ForInit => visit_for_init,
            ForUpdate => visit_for_update,
            ForeachStatement => visit_foreach_statement,
            SwitchStatement => visit_switch_statement,
            SwitchLabel => visit_switch_label,
            TryStatement => visit_try_statement,
            CatchStatement => visit_catch_statement,
            FinallyStatement => visit_finally_statement,
            DeclareStatement => visit_declare_statement,
            Expression => visit_expression,
            AssignmentExpression => visit_assignment_expression,
            ConditionalExpression => visit_conditional_expression,
            InstanceOfExpression => visit_instance_of_expression,
            UnaryExpression => visit_unary_expression,
            PreIncrementExpression => visit_pre_increment_expression,
            PreDecrementExpression => visit_pre_decrement_expression,
            PostfixExpression => visit_postfix_expression,
            CastExpression => visit_cast_expression,
            BooleanAndExpression => visit_boolean_and_expression,
            BooleanOrExpression => visit_boolean_or_expression,
            LogicalAndExpression => visit_logical_and_expression,
            LogicalOrExpression => visit_logical_or_expression,
            LogicalXorExpression => visit_logical_xor_expression,
            ShiftLeftExpression => visit_shift_left_expression,
            ShiftRightExpression => visit_shift_right_expression,
            AdditionExpression => visit_addition_expression,
            SubtractionExpression => visit_subtraction_expression,
            MultiplicationExpression => visit_multiplication_expression,
            DivisionExpression => visit_division_expression,
            ModuloExpression => visit_modulo_expression,
            PowExpression => visit_pow_expression,
            ConcatExpression => visit_concat_expression,
            BitwiseAndExpression => visit_bitwise_and_expression,
            BitwiseOrExpression => visit_bitwise_or_expression,
            BitwiseXorExpression => visit_bitwise_xor_expression,
            EqualExpression => visit_equal_expression,
            NotEqualExpression => visit_not_equal_expression,
            IdenticalExpression => visit_identical_expression,
            NotIdenticalExpression => visit_not_identical_expression,
            LessThanExpression => visit_less_than_expression,
            LessThanOrEqualExpression => visit_less_than_or_equal_expression,
            GreaterThanExpression => visit_greater_than_expression,
            GreaterThanOrEqualExpression => visit_greater_than_or_equal_expression,
            SpaceshipExpression => visit_spaceship_expression,
            CoalesceExpression => visit_coalesce_expression,
            MemberPrimaryPrefix => visit_member_primary_prefix,
            PropertyPostfix => visit_property_postfix,
            MethodPostfix => visit_method_postfix,
            ConstantPostfix => visit_constant_postfix,
            ClassFqnPostfix => visit_class_fqn_postfix,
            FunctionPostfix => visit_function_postfix,
            Arguments => visit_arguments,
            ArrayIndexExpression => visit_array_index_expression,
            StringIndexExpression => visit_string_index_expression,
            AllocationExpression => visit_allocation_expression,
            CloneExpression => visit_clone_expression,
            PrintExpression => visit_print_expression,
            ExitExpression => visit_exit_expression,
            EvalExpression => visit_eval_expression,
            IncludeExpression => visit_include_expression,
            RequireExpression => visit_require_expression,
            IssetExpression => visit_isset_expression,
            EmptyExpression => visit_empty_expression,
            ListExpression => visit_list_expression,
            Array => visit_array,
            ArrayElement => visit_array_element,
            YieldExpression => visit_yield_expression,
            Variable => visit_variable,
            VariableVariable => visit_variable_variable,
            CompoundVariable => visit_compound_variable,
            CompoundExpression => visit_compound_expression,
            Constant => visit_constant,
            Literal => visit_literal,
            Identifier => visit_identifier,
            String => visit_string,
            ShellExecExpression => visit_shell_exec_expression,
            Heredoc => visit_heredoc,
        }
    };
}

pub mod context;
pub mod kind;
pub mod node;
pub mod persist;
pub mod reference;
pub mod span;
pub mod tree;
pub mod value;
pub mod visitor;

pub use context::{BuilderContext, ContextError, TypeDecl, TypeKind};
pub use kind::{NodeKind, PersistedField};
pub use node::{flags, Metadata, NodeExtra, NodeId};
pub use persist::{Field, PersistError, PersistedNode};
pub use reference::{LookupKind, TypeReference};
pub use span::{LineIndex, Position, Span, TextRange};
pub use tree::{Ast, AstError, NodeRef};
pub use value::Value;
pub use visitor::Visitor;
