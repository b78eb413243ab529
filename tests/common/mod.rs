// tests/common/mod.rs
//! AST fixtures for integration tests, standing in for the external
//! parser.
#![allow(dead_code)] // each test binary uses a different subset

use turinc::ast::{
    ActualArg, CompilationUnit, ConstructorDecl, Expr, ExprKind, FormalParamDecl, MethodDecl,
    NamespaceDecl, NodeIdGen, ProgramDecl, PropertyDecl, Span, Stmt, TopLevelNode, TypeDecl,
    TypeExpr, TypeExprKind,
};
use turinc::typesystem::PrimitiveTypeUsage;

pub struct AstFactory {
    ids: NodeIdGen,
}

impl AstFactory {
    pub fn new() -> Self {
        Self {
            ids: NodeIdGen::new(),
        }
    }

    pub fn unit(&mut self, namespace: &str, nodes: Vec<TopLevelNode>) -> CompilationUnit {
        CompilationUnit {
            id: self.ids.fresh(),
            namespace: NamespaceDecl {
                id: self.ids.fresh(),
                name: namespace.to_string(),
                span: Span::synthetic(),
            },
            nodes,
            span: Span::synthetic(),
        }
    }

    pub fn type_decl(
        &mut self,
        name: &str,
        base_type: Option<TypeExpr>,
        members: Vec<turinc::ast::TypeMember>,
    ) -> TypeDecl {
        TypeDecl {
            id: self.ids.fresh(),
            name: name.to_string(),
            base_type,
            interfaces: vec![],
            annotations: vec![],
            members,
            span: Span::synthetic(),
        }
    }

    pub fn property(&mut self, name: &str, ty: TypeExpr) -> PropertyDecl {
        PropertyDecl {
            id: self.ids.fresh(),
            name: name.to_string(),
            ty,
            initial_value: None,
            default_value: None,
            span: Span::synthetic(),
        }
    }

    pub fn property_with_default(&mut self, name: &str, ty: TypeExpr, default: Expr) -> PropertyDecl {
        PropertyDecl {
            default_value: Some(default),
            ..self.property(name, ty)
        }
    }

    pub fn property_with_initializer(&mut self, name: &str, ty: TypeExpr, init: Expr) -> PropertyDecl {
        PropertyDecl {
            initial_value: Some(init),
            ..self.property(name, ty)
        }
    }

    pub fn method(
        &mut self,
        name: &str,
        params: Vec<FormalParamDecl>,
        return_type: TypeExpr,
    ) -> MethodDecl {
        MethodDecl {
            id: self.ids.fresh(),
            name: name.to_string(),
            params,
            return_type,
            body: vec![],
            span: Span::synthetic(),
        }
    }

    pub fn constructor(&mut self, params: Vec<FormalParamDecl>) -> ConstructorDecl {
        ConstructorDecl {
            id: self.ids.fresh(),
            params,
            body: vec![],
            span: Span::synthetic(),
        }
    }

    pub fn param(&mut self, name: &str, ty: TypeExpr) -> FormalParamDecl {
        FormalParamDecl {
            id: self.ids.fresh(),
            name: name.to_string(),
            ty,
            default_value: None,
            span: Span::synthetic(),
        }
    }

    pub fn program(&mut self, name: &str, body: Vec<Stmt>) -> ProgramDecl {
        ProgramDecl {
            id: self.ids.fresh(),
            name: name.to_string(),
            args_name: "args".to_string(),
            body,
            span: Span::synthetic(),
        }
    }

    pub fn int_type(&mut self) -> TypeExpr {
        self.primitive_type(PrimitiveTypeUsage::Int)
    }

    pub fn double_type(&mut self) -> TypeExpr {
        self.primitive_type(PrimitiveTypeUsage::Double)
    }

    pub fn primitive_type(&mut self, p: PrimitiveTypeUsage) -> TypeExpr {
        TypeExpr {
            id: self.ids.fresh(),
            kind: TypeExprKind::Primitive(p),
            span: Span::synthetic(),
        }
    }

    pub fn string_type(&mut self) -> TypeExpr {
        self.named_type("string")
    }

    pub fn named_type(&mut self, name: &str) -> TypeExpr {
        TypeExpr {
            id: self.ids.fresh(),
            kind: TypeExprKind::Named {
                name: name.to_string(),
                type_args: vec![],
            },
            span: Span::synthetic(),
        }
    }

    pub fn void_type(&mut self) -> TypeExpr {
        TypeExpr {
            id: self.ids.fresh(),
            kind: TypeExprKind::Void,
            span: Span::synthetic(),
        }
    }

    pub fn int_lit(&mut self, value: i32) -> Expr {
        self.expr(ExprKind::IntLiteral(value))
    }

    pub fn string_lit(&mut self, value: &str) -> Expr {
        self.expr(ExprKind::StringLiteral(value.to_string()))
    }

    pub fn creation(&mut self, type_name: &str, args: Vec<ActualArg>) -> Expr {
        self.expr(ExprKind::Creation {
            type_name: type_name.to_string(),
            args,
        })
    }

    pub fn value_ref(&mut self, name: &str) -> Expr {
        self.expr(ExprKind::ValueReference(name.to_string()))
    }

    pub fn field_access(&mut self, subject: Expr, name: &str) -> Expr {
        self.expr(ExprKind::FieldAccess {
            subject: Box::new(subject),
            name: name.to_string(),
        })
    }

    pub fn arg(&mut self, value: Expr) -> ActualArg {
        ActualArg {
            id: self.ids.fresh(),
            name: None,
            value,
            span: Span::synthetic(),
        }
    }

    pub fn named_arg(&mut self, name: &str, value: Expr) -> ActualArg {
        ActualArg {
            id: self.ids.fresh(),
            name: Some(name.to_string()),
            value,
            span: Span::synthetic(),
        }
    }

    fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr {
            id: self.ids.fresh(),
            kind,
            span: Span::synthetic(),
        }
    }
}

/// `Point` with `x: int` and `y: int = 0`.
pub fn point_unit(f: &mut AstFactory, namespace: &str) -> CompilationUnit {
    use turinc::ast::TypeMember;

    let x_ty = f.int_type();
    let x = f.property("x", x_ty);
    let y_ty = f.int_type();
    let zero = f.int_lit(0);
    let y = f.property_with_default("y", y_ty, zero);
    let point = f.type_decl(
        "Point",
        None,
        vec![TypeMember::Property(x), TypeMember::Property(y)],
    );
    f.unit(namespace, vec![TopLevelNode::Type(point)])
}

/// `Person` with `name: string`, `age: int = 30`, `nickname: string = "none"`.
pub fn person_members(f: &mut AstFactory) -> Vec<turinc::ast::TypeMember> {
    use turinc::ast::TypeMember;

    let name_ty = f.string_type();
    let name = f.property("name", name_ty);
    let age_ty = f.int_type();
    let thirty = f.int_lit(30);
    let age = f.property_with_default("age", age_ty, thirty);
    let nickname_ty = f.string_type();
    let none = f.string_lit("none");
    let nickname = f.property_with_default("nickname", nickname_ty, none);
    vec![
        TypeMember::Property(name),
        TypeMember::Property(age),
        TypeMember::Property(nickname),
    ]
}
