use super::function::Function;
use super::value::Value;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub struct Variable {
    pub name: String,
    pub value: Option<Value>,
    pub depth: usize,
    pub exclusive: bool,
}

impl Variable {
    pub fn new(name: &str, depth: usize, exclusive: bool) -> Self {
        Variable {
            name: name.to_owned(),
            value: None,
            depth,
            exclusive,
        }
    }

    /// A bound call argument. Parameters always live at depth 1.
    pub fn parameter(name: &str, value: Value) -> Self {
        Variable {
            name: name.to_owned(),
            value: Some(value),
            depth: 1,
            exclusive: false,
        }
    }
}

/// Names declared at one nesting level.
#[derive(Debug, Default)]
pub struct Scope {
    variables: HashMap<String, Variable>,
    functions: HashMap<String, Rc<Function>>,
}

impl Scope {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a variable. A name already declared in this scope keeps its
    /// first declaration; returns whether the variable was added.
    pub fn declare_variable(&mut self, variable: Variable) -> bool {
        match self.variables.entry(variable.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                v.insert(variable);
                true
            }
        }
    }

    /// Same first-declaration-wins rule as variables.
    pub fn declare_function(&mut self, function: Function) -> bool {
        match self.functions.entry(function.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                v.insert(Rc::new(function));
                true
            }
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.get_mut(name)
    }

    pub fn function(&self, name: &str) -> Option<&Rc<Function>> {
        self.functions.get(name)
    }
}

/// Which script a frame's globals belong to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Owner {
    Main,
    Import(usize),
}

/// Execution context threaded through every recursive `execute` call.
#[derive(Debug)]
pub struct Frame {
    pub owner: Owner,
    pub function: Option<Rc<Function>>,
    pub params: HashMap<String, Variable>,
    pub scopes: Vec<Scope>,
    pub declarations_only: bool,
}

impl Frame {
    /// Top level of the main script.
    pub fn script() -> Self {
        Frame {
            owner: Owner::Main,
            function: None,
            params: HashMap::new(),
            scopes: vec![],
            declarations_only: false,
        }
    }

    /// Declarations-only pass over an imported script.
    pub fn import(index: usize) -> Self {
        Frame {
            owner: Owner::Import(index),
            function: None,
            params: HashMap::new(),
            scopes: vec![],
            declarations_only: true,
        }
    }

    /// Activation of a function body with its own parameter bindings.
    pub fn call(owner: Owner, function: Rc<Function>, params: HashMap<String, Variable>) -> Self {
        Frame {
            owner,
            function: Some(function),
            params,
            scopes: vec![Scope::new()],
            declarations_only: false,
        }
    }

    /// Nesting level: 0 at top level, 1 in a function body, +1 per `if` block.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn in_function(&self) -> bool {
        self.function.is_some()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }
}

#[derive(Debug)]
pub struct ImportedScript {
    pub tag: String,
    pub globals: Scope,
}

/// Scripts pulled in by `use`, each tagged with its path or alias.
#[derive(Debug, Default)]
pub struct ImportTable {
    scripts: Vec<ImportedScript>,
}

impl ImportTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, path: &str) -> usize {
        self.scripts.push(ImportedScript {
            tag: path.to_owned(),
            globals: Scope::new(),
        });
        self.scripts.len() - 1
    }

    /// Retags every script imported under `path`. Returns how many were renamed.
    pub fn rename(&mut self, path: &str, alias: &str) -> usize {
        let mut renamed = 0;
        for script in self.scripts.iter_mut().filter(|s| s.tag == path) {
            script.tag = alias.to_owned();
            renamed += 1;
        }
        renamed
    }

    /// Index of the first script carrying `tag`.
    pub fn find(&self, tag: &str) -> Option<usize> {
        self.scripts.iter().position(|s| s.tag == tag)
    }

    /// Indices only come from `add`, so they are always in bounds.
    pub fn script(&self, index: usize) -> &ImportedScript {
        &self.scripts[index]
    }

    pub fn script_mut(&mut self, index: usize) -> &mut ImportedScript {
        &mut self.scripts[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_declaration_wins() {
        let mut scope = Scope::new();
        assert!(scope.declare_variable(Variable::new("x", 0, false)));
        scope.variable_mut("x").unwrap().value = Some(Value::Int(1));

        assert!(!scope.declare_variable(Variable::new("x", 0, true)));
        let x = scope.variable("x").unwrap();
        assert_eq!(x.value, Some(Value::Int(1)));
        assert!(!x.exclusive);
    }

    #[test]
    fn test_frame_depth() {
        let mut frame = Frame::script();
        assert_eq!(frame.depth(), 0);
        frame.push_scope();
        frame.push_scope();
        assert_eq!(frame.depth(), 2);
        frame.pop_scope();
        assert_eq!(frame.depth(), 1);
        assert!(!frame.in_function());
        assert!(Frame::import(0).declarations_only);
    }

    #[test]
    fn test_import_rename() {
        let mut imports = ImportTable::new();
        let first = imports.add("lib.cx");
        let second = imports.add("other.cx");

        assert_eq!(imports.rename("lib.cx", "lib"), 1);
        assert_eq!(imports.find("lib"), Some(first));
        assert_eq!(imports.find("lib.cx"), None);
        assert_eq!(imports.find("other.cx"), Some(second));
        assert_eq!(imports.rename("missing.cx", "m"), 0);
        assert_eq!(imports.script(first).tag, "lib");
    }
}
