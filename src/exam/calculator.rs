/// Four-function calculator for the exam's side panel. Evaluates strictly left to
/// right like a desk calculator; it has no operator precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' | 'x' | '×' => Some(Operator::Mul),
            '/' | '÷' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        let value = match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div if rhs == 0.0 => return None,
            Operator::Div => lhs / rhs,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Calculator {
    entry: String,
    accumulator: Option<f64>,
    pending: Option<Operator>,
    error: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key. Returns `false` when the key means nothing to the calculator.
    pub fn press(&mut self, ch: char) -> bool {
        if self.error {
            self.clear();
        }
        match ch {
            '0'..='9' => {
                if self.entry == "0" {
                    self.entry.clear();
                }
                self.entry.push(ch);
            }
            '.' | ',' => {
                if !self.entry.contains('.') {
                    if self.entry.is_empty() {
                        self.entry.push('0');
                    }
                    self.entry.push('.');
                }
            }
            '=' => self.evaluate(),
            _ => match Operator::from_char(ch) {
                Some(op) => self.operator(op),
                None => return false,
            },
        }
        true
    }

    pub fn backspace(&mut self) {
        if self.error {
            self.clear();
        } else {
            self.entry.pop();
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn operator(&mut self, op: Operator) {
        if !self.entry.is_empty() {
            self.fold_entry();
        }
        if !self.error {
            if self.accumulator.is_none() {
                self.accumulator = Some(0.0);
            }
            self.pending = Some(op);
        }
    }

    fn evaluate(&mut self) {
        if !self.entry.is_empty() {
            self.fold_entry();
        }
        self.pending = None;
    }

    fn fold_entry(&mut self) {
        let value: f64 = self.entry.parse().unwrap_or(0.0);
        self.entry.clear();
        let folded = match (self.accumulator, self.pending) {
            (Some(acc), Some(op)) => op.apply(acc, value),
            _ => Some(value),
        };
        match folded {
            Some(v) => self.accumulator = Some(v),
            None => {
                self.error = true;
                self.accumulator = None;
                self.pending = None;
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn value(&self) -> Option<f64> {
        self.accumulator
    }

    /// Text for the display line: the entry being typed, else the running total.
    pub fn display(&self) -> String {
        if self.error {
            return "Error".to_string();
        }
        if !self.entry.is_empty() {
            return self.entry.clone();
        }
        match self.accumulator {
            Some(v) => format_number(v),
            None => "0".to_string(),
        }
    }

    /// Pending expression shown above the display, e.g. `12 +`.
    pub fn expression(&self) -> String {
        match (self.accumulator, self.pending) {
            (Some(acc), Some(op)) => format!("{} {}", format_number(acc), op.symbol()),
            _ => String::new(),
        }
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.6}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
