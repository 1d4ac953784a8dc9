use ecoflow_lib::predictor::{format_kg, parse_number, ForecastService, PredictionRequest};
use ecoflow_lib::reference;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    TaskSelect,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    Forecast,
    Route,
    Insights,
    BinStatus,
    Quit,
}

/// One editable input of a task form
#[derive(Debug, Clone, Copy)]
pub(crate) struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
}

const FORECAST_FIELDS: &[FormField] = &[
    FormField { label: "Location", hint: "Zone A" },
    FormField { label: "Temperature (°C)", hint: "25" },
    FormField { label: "Humidity (%)", hint: "60" },
    FormField { label: "Day of Week", hint: "Monday" },
];

const ROUTE_FIELDS: &[FormField] = &[FormField { label: "Location", hint: "Zone A" }];

const BIN_FIELDS: &[FormField] = &[FormField { label: "Bin", hint: "Bin 1" }];

impl Task {
    pub(crate) const ALL: [Task; 5] = [
        Task::Forecast,
        Task::Route,
        Task::Insights,
        Task::BinStatus,
        Task::Quit,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Task::Forecast => "Waste Generation Forecasting",
            Task::Route => "Route Optimization",
            Task::Insights => "Insights",
            Task::BinStatus => "Bin Status",
            Task::Quit => "Quit",
        }
    }

    pub(crate) fn fields(self) -> &'static [FormField] {
        match self {
            Task::Forecast => FORECAST_FIELDS,
            Task::Route => ROUTE_FIELDS,
            Task::BinStatus => BIN_FIELDS,
            Task::Insights | Task::Quit => &[],
        }
    }
}

pub(crate) struct App {
    pub service: Arc<ForecastService>,

    pub screen: Screen,
    pub task_index: usize,

    /// Form of the selected task, rebuilt every time a task is opened
    pub inputs: Vec<String>,
    pub field_index: usize,

    pub result: Vec<String>,
    pub error_message: Option<String>,
    pub notice: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<ForecastService>) -> Self {
        let notice = (!service.is_model_loaded())
            .then(|| "Forecast model not loaded; forecasts are unavailable".to_string());
        Self {
            service,
            screen: Screen::TaskSelect,
            task_index: 0,
            inputs: Vec::new(),
            field_index: 0,
            result: Vec::new(),
            error_message: None,
            notice,
        }
    }

    pub(crate) fn selected_task(&self) -> Task {
        Task::ALL[self.task_index.min(Task::ALL.len() - 1)]
    }

    pub(crate) fn fields(&self) -> &'static [FormField] {
        self.selected_task().fields()
    }

    /// Switch to the form of the highlighted task with empty inputs
    pub(crate) fn open_selected_task(&mut self) {
        self.inputs = vec![String::new(); self.fields().len()];
        self.field_index = 0;
        self.result.clear();
        self.error_message = None;
        self.screen = Screen::Form;
    }

    pub(crate) fn back_to_tasks(&mut self) {
        self.screen = Screen::TaskSelect;
        self.result.clear();
        self.error_message = None;
    }

    pub(crate) fn next_field(&mut self) {
        if !self.inputs.is_empty() {
            self.field_index = (self.field_index + 1) % self.inputs.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.inputs.is_empty() {
            self.field_index = (self.field_index + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    pub(crate) fn current_input_mut(&mut self) -> Option<&mut String> {
        self.inputs.get_mut(self.field_index)
    }

    /// Run the selected task with the current inputs
    pub(crate) fn submit(&mut self) {
        let outcome = match self.selected_task() {
            Task::Forecast => self.forecast(),
            Task::Route => self.route(),
            Task::Insights => Ok(insights_lines()),
            Task::BinStatus => self.bin_status(),
            Task::Quit => Ok(Vec::new()),
        };

        match outcome {
            Ok(lines) => {
                self.result = lines;
                self.error_message = None;
            }
            Err(message) => {
                self.result.clear();
                self.error_message = Some(message);
            }
        }
    }

    fn input(&self, index: usize) -> &str {
        self.inputs.get(index).map(String::as_str).unwrap_or_default()
    }

    fn forecast(&self) -> Result<Vec<String>, String> {
        // The form has no defaults: both readings must be numbers
        let temperature = parse_number(self.input(1), "temperature").map_err(|e| e.to_string())?;
        let humidity = parse_number(self.input(2), "humidity").map_err(|e| e.to_string())?;

        let request = PredictionRequest::new(self.input(0), temperature, humidity, self.input(3));
        let forecast = self.service.predict(&request).map_err(|e| e.to_string())?;
        Ok(vec![format!("Predicted Waste Generation: {}", forecast)])
    }

    fn route(&self) -> Result<Vec<String>, String> {
        let route = reference::optimize_route(self.input(0)).map_err(|e| e.to_string())?;
        Ok(vec![format!("Optimized Route: {}", route)])
    }

    fn bin_status(&self) -> Result<Vec<String>, String> {
        let status = reference::bin_status(self.input(0)).map_err(|e| e.to_string())?;
        Ok(vec![
            status.bin.clone(),
            format!("Filled: {}", status.filled_label()),
            format!("Empty: {}", status.empty_label()),
            format!("Capacity: {}", status.capacity_label()),
        ])
    }
}

fn insights_lines() -> Vec<String> {
    let insights = reference::insights();
    vec![
        "Waste Generation Insights:".to_string(),
        format!("Average Waste: {}", format_kg(insights.mean_kg)),
        format!("Maximum Waste: {}", format_kg(insights.max_kg)),
        format!("Minimum Waste: {}", format_kg(insights.min_kg)),
    ]
}
